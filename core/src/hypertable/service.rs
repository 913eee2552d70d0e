//! hypertable/service.rs
//! Method table for the HQL and client services, and the schema registry
//! preloaded with every Hypertable record.

use crate::hypertable::schemas::*;
use crate::rpc::MethodSpec;
use crate::schema::{SchemaError, SchemaRegistry};

pub static HQL_EXEC: MethodSpec = MethodSpec::new("hql_exec", &HQL_EXEC_ARGS, &HQL_EXEC_RESULT);
pub static HQL_QUERY: MethodSpec = MethodSpec::new("hql_query", &HQL_QUERY_ARGS, &HQL_QUERY_RESULT);
pub static HQL_EXEC2: MethodSpec = MethodSpec::new("hql_exec2", &HQL_EXEC2_ARGS, &HQL_EXEC2_RESULT);
pub static HQL_QUERY2: MethodSpec = MethodSpec::new("hql_query2", &HQL_QUERY2_ARGS, &HQL_QUERY2_RESULT);
pub static HQL_EXEC_AS_ARRAYS: MethodSpec =
    MethodSpec::new("hql_exec_as_arrays", &HQL_EXEC_AS_ARRAYS_ARGS, &HQL_EXEC_AS_ARRAYS_RESULT);
pub static HQL_QUERY_AS_ARRAYS: MethodSpec =
    MethodSpec::new("hql_query_as_arrays", &HQL_QUERY_AS_ARRAYS_ARGS, &HQL_QUERY_AS_ARRAYS_RESULT);

pub static DROP_TABLE: MethodSpec = MethodSpec::new("drop_table", &DROP_TABLE_ARGS, &DROP_TABLE_RESULT);
pub static GET_SCHEMA_STR_WITH_IDS: MethodSpec =
    MethodSpec::new("get_schema_str_with_ids", &GET_SCHEMA_STR_WITH_IDS_ARGS, &GET_SCHEMA_STR_WITH_IDS_RESULT);
pub static OPEN_MUTATOR: MethodSpec = MethodSpec::new("open_mutator", &OPEN_MUTATOR_ARGS, &OPEN_MUTATOR_RESULT);
pub static SET_CELLS_ASYNC: MethodSpec =
    MethodSpec::new("set_cells_async", &SET_CELLS_ASYNC_ARGS, &SET_CELLS_ASYNC_RESULT);
pub static ASYNC_MUTATOR_CLOSE: MethodSpec =
    MethodSpec::new("async_mutator_close", &ASYNC_MUTATOR_CLOSE_ARGS, &ASYNC_MUTATOR_CLOSE_RESULT);
pub static ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS: MethodSpec = MethodSpec::new(
    "async_mutator_set_cells_as_arrays",
    &ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS_ARGS,
    &ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS_RESULT,
);
pub static CLOSE_SCANNER: MethodSpec = MethodSpec::new("close_scanner", &CLOSE_SCANNER_ARGS, &CLOSE_SCANNER_RESULT);
pub static OFFER_CELL_AS_ARRAY: MethodSpec =
    MethodSpec::new("offer_cell_as_array", &OFFER_CELL_AS_ARRAY_ARGS, &OFFER_CELL_AS_ARRAY_RESULT);

pub static METHODS: [&MethodSpec; 14] = [
    &HQL_EXEC,
    &HQL_QUERY,
    &HQL_EXEC2,
    &HQL_QUERY2,
    &HQL_EXEC_AS_ARRAYS,
    &HQL_QUERY_AS_ARRAYS,
    &DROP_TABLE,
    &GET_SCHEMA_STR_WITH_IDS,
    &OPEN_MUTATOR,
    &SET_CELLS_ASYNC,
    &ASYNC_MUTATOR_CLOSE,
    &ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS,
    &CLOSE_SCANNER,
    &OFFER_CELL_AS_ARRAY,
];

pub fn method_by_name(name: &str) -> Option<&'static MethodSpec> {
    METHODS.iter().copied().find(|m| m.name == name)
}

impl SchemaRegistry {
    /// Registry holding every Hypertable data record and every method's
    /// args/result record.
    pub fn hypertable() -> Result<Self, SchemaError> {
        let mut registry = SchemaRegistry::new();
        for schema in DATA_RECORDS {
            registry.register(schema)?;
        }
        for method in METHODS {
            registry.register(method.args)?;
            registry.register(method.result)?;
        }
        Ok(registry)
    }
}
