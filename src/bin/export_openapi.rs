//! Export OpenAPI specifications to static JSON files
//!
//! Usage: cargo run --bin export_openapi
//!
//! Generates docs/openapi-sentiment.json and docs/openapi-coach.json.

use completion_gateway::{config::Service, docs::openapi_for};
use std::fs;

fn main() {
    fs::create_dir_all("docs").expect("Failed to create docs directory");

    for service in [Service::Sentiment, Service::Coach] {
        let json = openapi_for(service)
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec");
        let path = format!("docs/openapi-{}.json", service);
        fs::write(&path, json).expect("Failed to write OpenAPI spec");
        println!("Exported OpenAPI spec to {}", path);
    }
}
