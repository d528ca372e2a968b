//! @title Swagger Petstore
//! @version 1.0
//! @description This is a sample server Petstore server.
//! @tag.name dogs
//! @tag.description Dogs are cool
//! @tag.name cats
//! @tag.description.markdown
//! @tag.name birds

mod handlers;
mod models;

/// @description Pets are sold by the store.
#[tokio::main]
async fn main() {
    handlers::serve().await;
}
