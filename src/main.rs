/*!
Here we go!
*/
use axum::{
    extract::Extension,
    Router,
    routing::{get, post, put},
};
use simplelog::{ColorChoice, TerminalMode, TermLogger};

use fluente::config;
use fluente::inter::{admin, lessons, student, teacher};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("fluente")
        .build();
    TermLogger::init(
        fluente::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto
    ).unwrap();
    log::info!("Logging started.");

    let config_path = std::env::args().nth(1)
        .unwrap_or_else(|| "fluente.toml".to_owned());
    let glob = config::load_configuration(&config_path).await.unwrap();
    let addr = glob.addr;

    let app = Router::new()
        .route("/plans", get(student::plans))
        .route(
            "/students",
            get(admin::list_students).post(student::signup)
        )
        .route("/students/lessons", get(student::own_lessons))
        .route(
            "/students/:id",
            put(admin::update_student).delete(admin::delete_student)
        )
        .route(
            "/teachers",
            get(teacher::find).post(admin::add_teacher)
        )
        .route("/teachers/lessons", get(teacher::own_lessons))
        .route(
            "/teachers/:id",
            put(admin::update_teacher).delete(admin::delete_teacher)
        )
        .route(
            "/admins",
            get(admin::list_admins).post(admin::add_admin)
        )
        .route(
            "/admins/:id",
            put(admin::update_admin).delete(admin::delete_admin)
        )
        .route("/lessons", post(lessons::create))
        .route(
            "/lessons/:id",
            put(lessons::update).delete(lessons::delete)
        )
        .layer(Extension(glob));

    log::info!("Listening on {}", &addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
