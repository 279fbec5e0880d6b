//! Route definitions for the `/projects` resource and everything nested
//! under a project.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{character, costume, image, location, measurements, project, scene};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                                  -> list
/// POST   /                                                  -> create
/// GET    /{project_id}                                      -> get_by_id
/// PUT    /{project_id}                                      -> update
/// DELETE /{project_id}                                      -> delete
/// POST   /{project_id}/members/{user_id}                    -> add_member
/// DELETE /{project_id}/members/{user_id}                    -> remove_member
/// GET    /{project_id}/integrity                            -> integrity
///
/// GET    /{project_id}/characters                           -> list
/// POST   /{project_id}/characters                           -> create
/// GET    /{project_id}/characters/{character_id}            -> get_by_id
/// PUT    /{project_id}/characters/{character_id}            -> update
/// DELETE /{project_id}/characters/{character_id}            -> delete
///
/// GET    /{project_id}/characters/{character_id}/costumes   -> list
/// POST   /{project_id}/characters/{character_id}/costumes   -> create
/// DELETE /{project_id}/characters/{character_id}/costumes   -> delete_all
/// GET    .../costumes/{costume_id}                          -> get_by_id
/// PUT    .../costumes/{costume_id}                          -> update
/// DELETE .../costumes/{costume_id}                          -> delete
/// PUT    .../costumes/{costume_id}/scenes                   -> attach_scenes
/// PUT    .../costumes/{costume_id}/scenes/{scene_id}        -> attach_scene
/// DELETE .../costumes/{costume_id}/scenes/{scene_id}        -> detach_scene
///
/// GET    /{project_id}/characters/{character_id}/measurements  -> get
/// POST   /{project_id}/characters/{character_id}/measurements  -> replace
/// PUT    /{project_id}/characters/{character_id}/measurements  -> update
/// DELETE /{project_id}/characters/{character_id}/measurements  -> delete
///
/// GET    /{project_id}/scenes                               -> list
/// POST   /{project_id}/scenes                               -> create
/// GET    /{project_id}/scenes/search?q=                     -> search
/// GET    /{project_id}/scenes/duplicate-numbers             -> duplicate_numbers
/// GET    /{project_id}/scenes/{scene_id}                    -> get_by_id
/// PUT    /{project_id}/scenes/{scene_id}                    -> update
/// DELETE /{project_id}/scenes/{scene_id}                    -> delete
/// PUT    /{project_id}/scenes/{scene_id}/characters/{character_id}  -> attach_character
/// DELETE /{project_id}/scenes/{scene_id}/characters/{character_id}  -> detach_character
///
/// GET    /{project_id}/locations                            -> list
/// POST   /{project_id}/locations                            -> create
/// GET    /{project_id}/locations/{location_id}              -> get_by_id
/// PUT    /{project_id}/locations/{location_id}              -> update
/// DELETE /{project_id}/locations/{location_id}              -> delete
/// PUT    /{project_id}/locations/{location_id}/scenes/{scene_id}  -> attach_scene
/// DELETE /{project_id}/locations/{location_id}/scenes/{scene_id}  -> detach_scene
///
/// GET    /{project_id}/images                               -> list
/// POST   /{project_id}/images                               -> create
/// GET    /{project_id}/images/{image_id}                    -> get_by_id
/// DELETE /{project_id}/images/{image_id}                    -> delete
/// ```
pub fn router() -> Router<AppState> {
    let costume_routes = Router::new()
        .route(
            "/",
            get(costume::list)
                .post(costume::create)
                .delete(costume::delete_all),
        )
        .route(
            "/{costume_id}",
            get(costume::get_by_id)
                .put(costume::update)
                .delete(costume::delete),
        )
        .route("/{costume_id}/scenes", put(costume::attach_scenes))
        .route(
            "/{costume_id}/scenes/{scene_id}",
            put(costume::attach_scene).delete(costume::detach_scene),
        );

    let character_routes = Router::new()
        .route("/", get(character::list).post(character::create))
        .route(
            "/{character_id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        )
        .route(
            "/{character_id}/measurements",
            get(measurements::get)
                .post(measurements::replace)
                .put(measurements::update)
                .delete(measurements::delete),
        )
        .nest("/{character_id}/costumes", costume_routes);

    let scene_routes = Router::new()
        .route("/", get(scene::list).post(scene::create))
        .route("/search", get(scene::search))
        .route("/duplicate-numbers", get(scene::duplicate_numbers))
        .route(
            "/{scene_id}",
            get(scene::get_by_id)
                .put(scene::update)
                .delete(scene::delete),
        )
        .route(
            "/{scene_id}/characters/{character_id}",
            put(scene::attach_character).delete(scene::detach_character),
        );

    let location_routes = Router::new()
        .route("/", get(location::list).post(location::create))
        .route(
            "/{location_id}",
            get(location::get_by_id)
                .put(location::update)
                .delete(location::delete),
        )
        .route(
            "/{location_id}/scenes/{scene_id}",
            put(location::attach_scene).delete(location::detach_scene),
        );

    let image_routes = Router::new()
        .route("/", get(image::list).post(image::create))
        .route("/{image_id}", get(image::get_by_id).delete(image::delete));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project_id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{project_id}/members/{user_id}",
            post(project::add_member).delete(project::remove_member),
        )
        .route("/{project_id}/integrity", get(project::integrity))
        .nest("/{project_id}/characters", character_routes)
        .nest("/{project_id}/scenes", scene_routes)
        .nest("/{project_id}/locations", location_routes)
        .nest("/{project_id}/images", image_routes)
}
