//! Schema for the top-level `config.json`.

use std::sync::OnceLock;

use super::data::bbox;
use super::{optional, required, Schema};

fn agency() -> Schema {
    Schema::open_object(vec![
        required("id", Schema::non_empty_string()),
        required("name", Schema::non_empty_string()),
        required("bbox", bbox()),
        required("data", Schema::array(Schema::non_empty_string())),
    ])
}

fn region() -> Schema {
    Schema::open_object(vec![
        required("id", Schema::non_empty_string()),
        required("title", Schema::non_empty_string()),
        required("location", Schema::array_of_len(Schema::number(), 2, Some(2))),
        required("bbox", bbox()),
        required("tier", Schema::Integer { min: Some(1), max: Some(3) }),
        required("agencies", Schema::array(Schema::non_empty_string())),
    ])
}

fn build() -> Schema {
    Schema::object(vec![
        required("agencies", Schema::array(agency())),
        required("regions", Schema::array(region())),
        optional("$schema", Schema::string()),
    ])
}

pub fn config_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build)
}
