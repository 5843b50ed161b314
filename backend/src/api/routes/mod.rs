use actix_web::web::{Either, Form, Json};

pub mod auth;
pub mod middleware;
pub mod users;

/// Corps de requête accepté en JSON ou en `application/x-www-form-urlencoded`
pub type Body<T> = Either<Json<T>, Form<T>>;
