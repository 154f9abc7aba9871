pub mod geojson;
pub mod route;
