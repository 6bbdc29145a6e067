// Infrastructure layer: port implementations, file I/O, serde, eventing
pub mod bfs_path;
pub mod event_ndjson;
pub mod json_mask_store;
pub mod report_json_adapter;
pub mod schema_validator;
pub mod union_find;
