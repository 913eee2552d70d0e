//! hypertable/schemas.rs
//! Field tables for the Hypertable Thrift records.
//!
//! Notes:
//! - Ids, names and wire types must match the broker's IDL exactly.
//! - Nested type descriptors that are referenced from `list<...>` are
//!   named statics so every reference is `'static`.

use crate::constants::SUCCESS_FIELD_ID;
use crate::hypertable::types::{key_flag_ids, mutator_flag_ids};
use crate::schema::{DefaultValue, FieldSpec, RecordSchema, TypeDesc};

// --- element descriptors ------------------------------------------------------

static STRING_T: TypeDesc = TypeDesc::String;
static STRING_LIST_T: TypeDesc = TypeDesc::List(&STRING_T);
static CELL_T: TypeDesc = TypeDesc::Struct(&CELL);

// --- data records ----------------------------------------------------------------

pub static KEY: RecordSchema = RecordSchema {
    name: "Key",
    fields: &[
        FieldSpec::optional(1, "row", TypeDesc::String),
        FieldSpec::optional(2, "column_family", TypeDesc::String),
        FieldSpec::optional(3, "column_qualifier", TypeDesc::String),
        FieldSpec::optional(4, "timestamp", TypeDesc::I64),
        FieldSpec::optional(5, "revision", TypeDesc::I64),
        FieldSpec::optional(6, "flag", TypeDesc::I32).with_default(DefaultValue::I32(key_flag_ids::INSERT)),
    ],
};

pub static CELL: RecordSchema = RecordSchema {
    name: "Cell",
    fields: &[
        FieldSpec::optional(1, "key", TypeDesc::Struct(&KEY)),
        FieldSpec::optional(2, "value", TypeDesc::String),
    ],
};

pub static CLIENT_EXCEPTION: RecordSchema = RecordSchema {
    name: "ClientException",
    fields: &[
        FieldSpec::optional(1, "code", TypeDesc::I32),
        FieldSpec::optional(2, "message", TypeDesc::String),
    ],
};

pub static MUTATE_SPEC: RecordSchema = RecordSchema {
    name: "MutateSpec",
    fields: &[
        FieldSpec::required(1, "appname", TypeDesc::String).with_default(DefaultValue::Str("")),
        FieldSpec::required(2, "flush_interval", TypeDesc::I32).with_default(DefaultValue::I32(1000)),
        FieldSpec::required(3, "flags", TypeDesc::I32)
            .with_default(DefaultValue::I32(mutator_flag_ids::IGNORE_UNKNOWN_CFS)),
    ],
};

pub static ROW_INTERVAL: RecordSchema = RecordSchema {
    name: "RowInterval",
    fields: &[
        FieldSpec::optional(1, "start_row", TypeDesc::String),
        FieldSpec::optional(2, "start_inclusive", TypeDesc::Bool).with_default(DefaultValue::Bool(true)),
        FieldSpec::optional(3, "end_row", TypeDesc::String),
        FieldSpec::optional(4, "end_inclusive", TypeDesc::Bool).with_default(DefaultValue::Bool(true)),
    ],
};

pub static COLUMN_FAMILY_OPTIONS: RecordSchema = RecordSchema {
    name: "ColumnFamilyOptions",
    fields: &[
        FieldSpec::optional(1, "max_versions", TypeDesc::I32),
        FieldSpec::optional(2, "ttl", TypeDesc::I32),
        FieldSpec::optional(3, "time_order_desc", TypeDesc::Bool),
        FieldSpec::optional(4, "counter", TypeDesc::Bool),
    ],
};

pub static ACCESS_GROUP_OPTIONS: RecordSchema = RecordSchema {
    name: "AccessGroupOptions",
    fields: &[
        FieldSpec::optional(1, "replication", TypeDesc::I16),
        FieldSpec::optional(2, "blocksize", TypeDesc::I32),
        FieldSpec::optional(3, "compressor", TypeDesc::String),
        FieldSpec::optional(4, "bloom_filter", TypeDesc::String),
        FieldSpec::optional(5, "in_memory", TypeDesc::Bool),
    ],
};

pub static ACCESS_GROUP_SPEC: RecordSchema = RecordSchema {
    name: "AccessGroupSpec",
    fields: &[
        FieldSpec::optional(1, "name", TypeDesc::String),
        FieldSpec::optional(2, "generation", TypeDesc::I64),
        FieldSpec::optional(3, "options", TypeDesc::Struct(&ACCESS_GROUP_OPTIONS)),
        FieldSpec::optional(4, "defaults", TypeDesc::Struct(&COLUMN_FAMILY_OPTIONS)),
    ],
};

pub static COLUMN_FAMILY_SPEC: RecordSchema = RecordSchema {
    name: "ColumnFamilySpec",
    fields: &[
        FieldSpec::optional(1, "name", TypeDesc::String),
        FieldSpec::optional(2, "access_group", TypeDesc::String),
        FieldSpec::optional(3, "deleted", TypeDesc::Bool),
        FieldSpec::optional(4, "generation", TypeDesc::I64),
        FieldSpec::optional(5, "id", TypeDesc::I32),
        FieldSpec::optional(6, "value_index", TypeDesc::Bool),
        FieldSpec::optional(7, "qualifier_index", TypeDesc::Bool),
        FieldSpec::optional(8, "options", TypeDesc::Struct(&COLUMN_FAMILY_OPTIONS)),
    ],
};

pub static HQL_RESULT: RecordSchema = RecordSchema {
    name: "HqlResult",
    fields: &[
        FieldSpec::optional(1, "results", TypeDesc::List(&STRING_T)),
        FieldSpec::optional(2, "cells", TypeDesc::List(&CELL_T)),
        FieldSpec::optional(3, "scanner", TypeDesc::I64),
        FieldSpec::optional(4, "mutator", TypeDesc::I64),
    ],
};

static HQL_RESULT_ARRAY_FIELDS: [FieldSpec; 4] = [
    FieldSpec::optional(1, "results", TypeDesc::List(&STRING_T)),
    FieldSpec::optional(2, "cells", TypeDesc::List(&STRING_LIST_T)),
    FieldSpec::optional(3, "scanner", TypeDesc::I64),
    FieldSpec::optional(4, "mutator", TypeDesc::I64),
];

pub static HQL_RESULT2: RecordSchema = RecordSchema {
    name: "HqlResult2",
    fields: &HQL_RESULT_ARRAY_FIELDS,
};

pub static HQL_RESULT_AS_ARRAYS: RecordSchema = RecordSchema {
    name: "HqlResultAsArrays",
    fields: &HQL_RESULT_ARRAY_FIELDS,
};

/// Every data record, in dependency order.
pub static DATA_RECORDS: [&RecordSchema; 12] = [
    &KEY,
    &CELL,
    &CLIENT_EXCEPTION,
    &MUTATE_SPEC,
    &ROW_INTERVAL,
    &COLUMN_FAMILY_OPTIONS,
    &ACCESS_GROUP_OPTIONS,
    &ACCESS_GROUP_SPEC,
    &COLUMN_FAMILY_SPEC,
    &HQL_RESULT,
    &HQL_RESULT2,
    &HQL_RESULT_AS_ARRAYS,
];

// --- method args / results ----------------------------------------------------
// Every Result record carries the declared exception in slot 1 `e`.

static VOID_RESULT_FIELDS: [FieldSpec; 1] = [FieldSpec::optional(1, "e", TypeDesc::Struct(&CLIENT_EXCEPTION))];

static HQL_EXEC_ARG_FIELDS: [FieldSpec; 4] = [
    FieldSpec::optional(1, "ns", TypeDesc::I64),
    FieldSpec::optional(2, "command", TypeDesc::String),
    FieldSpec::optional(3, "noflush", TypeDesc::Bool).with_default(DefaultValue::Bool(false)),
    FieldSpec::optional(4, "unbuffered", TypeDesc::Bool).with_default(DefaultValue::Bool(false)),
];

static HQL_QUERY_ARG_FIELDS: [FieldSpec; 2] = [
    FieldSpec::optional(1, "ns", TypeDesc::I64),
    FieldSpec::optional(2, "command", TypeDesc::String),
];

static HQL_RESULT_RESULT_FIELDS: [FieldSpec; 2] = [
    FieldSpec::optional(SUCCESS_FIELD_ID, "success", TypeDesc::Struct(&HQL_RESULT)),
    FieldSpec::optional(1, "e", TypeDesc::Struct(&CLIENT_EXCEPTION)),
];

static HQL_RESULT2_RESULT_FIELDS: [FieldSpec; 2] = [
    FieldSpec::optional(SUCCESS_FIELD_ID, "success", TypeDesc::Struct(&HQL_RESULT2)),
    FieldSpec::optional(1, "e", TypeDesc::Struct(&CLIENT_EXCEPTION)),
];

static HQL_RESULT_AS_ARRAYS_RESULT_FIELDS: [FieldSpec; 2] = [
    FieldSpec::optional(SUCCESS_FIELD_ID, "success", TypeDesc::Struct(&HQL_RESULT_AS_ARRAYS)),
    FieldSpec::optional(1, "e", TypeDesc::Struct(&CLIENT_EXCEPTION)),
];

pub static HQL_EXEC_ARGS: RecordSchema = RecordSchema { name: "HqlService_hql_exec_args", fields: &HQL_EXEC_ARG_FIELDS };
pub static HQL_EXEC_RESULT: RecordSchema = RecordSchema { name: "HqlService_hql_exec_result", fields: &HQL_RESULT_RESULT_FIELDS };

pub static HQL_QUERY_ARGS: RecordSchema = RecordSchema { name: "HqlService_hql_query_args", fields: &HQL_QUERY_ARG_FIELDS };
pub static HQL_QUERY_RESULT: RecordSchema = RecordSchema { name: "HqlService_hql_query_result", fields: &HQL_RESULT_RESULT_FIELDS };

pub static HQL_EXEC2_ARGS: RecordSchema = RecordSchema { name: "HqlService_hql_exec2_args", fields: &HQL_EXEC_ARG_FIELDS };
pub static HQL_EXEC2_RESULT: RecordSchema = RecordSchema { name: "HqlService_hql_exec2_result", fields: &HQL_RESULT2_RESULT_FIELDS };

pub static HQL_QUERY2_ARGS: RecordSchema = RecordSchema { name: "HqlService_hql_query2_args", fields: &HQL_QUERY_ARG_FIELDS };
pub static HQL_QUERY2_RESULT: RecordSchema = RecordSchema { name: "HqlService_hql_query2_result", fields: &HQL_RESULT2_RESULT_FIELDS };

pub static HQL_EXEC_AS_ARRAYS_ARGS: RecordSchema =
    RecordSchema { name: "HqlService_hql_exec_as_arrays_args", fields: &HQL_EXEC_ARG_FIELDS };
pub static HQL_EXEC_AS_ARRAYS_RESULT: RecordSchema =
    RecordSchema { name: "HqlService_hql_exec_as_arrays_result", fields: &HQL_RESULT_AS_ARRAYS_RESULT_FIELDS };

pub static HQL_QUERY_AS_ARRAYS_ARGS: RecordSchema =
    RecordSchema { name: "HqlService_hql_query_as_arrays_args", fields: &HQL_QUERY_ARG_FIELDS };
pub static HQL_QUERY_AS_ARRAYS_RESULT: RecordSchema =
    RecordSchema { name: "HqlService_hql_query_as_arrays_result", fields: &HQL_RESULT_AS_ARRAYS_RESULT_FIELDS };

pub static DROP_TABLE_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_drop_table_args",
    fields: &[
        FieldSpec::optional(1, "ns", TypeDesc::I64),
        FieldSpec::optional(2, "name", TypeDesc::String),
        FieldSpec::optional(3, "if_exists", TypeDesc::Bool).with_default(DefaultValue::Bool(true)),
    ],
};
pub static DROP_TABLE_RESULT: RecordSchema =
    RecordSchema { name: "ClientService_drop_table_result", fields: &VOID_RESULT_FIELDS };

pub static GET_SCHEMA_STR_WITH_IDS_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_get_schema_str_with_ids_args",
    fields: &[
        FieldSpec::optional(1, "ns", TypeDesc::I64),
        FieldSpec::optional(2, "table_name", TypeDesc::String),
    ],
};
pub static GET_SCHEMA_STR_WITH_IDS_RESULT: RecordSchema = RecordSchema {
    name: "ClientService_get_schema_str_with_ids_result",
    fields: &[
        FieldSpec::optional(SUCCESS_FIELD_ID, "success", TypeDesc::String),
        FieldSpec::optional(1, "e", TypeDesc::Struct(&CLIENT_EXCEPTION)),
    ],
};

pub static OPEN_MUTATOR_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_open_mutator_args",
    fields: &[
        FieldSpec::optional(1, "ns", TypeDesc::I64),
        FieldSpec::optional(2, "table_name", TypeDesc::String),
        FieldSpec::optional(3, "flags", TypeDesc::I32).with_default(DefaultValue::I32(0)),
        FieldSpec::optional(4, "flush_interval", TypeDesc::I32).with_default(DefaultValue::I32(0)),
    ],
};
pub static OPEN_MUTATOR_RESULT: RecordSchema = RecordSchema {
    name: "ClientService_open_mutator_result",
    fields: &[
        FieldSpec::optional(SUCCESS_FIELD_ID, "success", TypeDesc::I64),
        FieldSpec::optional(1, "e", TypeDesc::Struct(&CLIENT_EXCEPTION)),
    ],
};

pub static SET_CELLS_ASYNC_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_set_cells_async_args",
    fields: &[
        FieldSpec::optional(1, "mutator", TypeDesc::I64),
        FieldSpec::optional(2, "cells", TypeDesc::List(&CELL_T)),
    ],
};
pub static SET_CELLS_ASYNC_RESULT: RecordSchema =
    RecordSchema { name: "ClientService_set_cells_async_result", fields: &VOID_RESULT_FIELDS };

pub static ASYNC_MUTATOR_CLOSE_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_async_mutator_close_args",
    fields: &[FieldSpec::optional(1, "mutator", TypeDesc::I64)],
};
pub static ASYNC_MUTATOR_CLOSE_RESULT: RecordSchema =
    RecordSchema { name: "ClientService_async_mutator_close_result", fields: &VOID_RESULT_FIELDS };

pub static ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_async_mutator_set_cells_as_arrays_args",
    fields: &[
        FieldSpec::optional(1, "mutator", TypeDesc::I64),
        FieldSpec::optional(2, "cells", TypeDesc::List(&STRING_LIST_T)),
    ],
};
pub static ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS_RESULT: RecordSchema =
    RecordSchema { name: "ClientService_async_mutator_set_cells_as_arrays_result", fields: &VOID_RESULT_FIELDS };

pub static CLOSE_SCANNER_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_close_scanner_args",
    fields: &[FieldSpec::optional(1, "scanner", TypeDesc::I64)],
};
pub static CLOSE_SCANNER_RESULT: RecordSchema =
    RecordSchema { name: "ClientService_close_scanner_result", fields: &VOID_RESULT_FIELDS };

pub static OFFER_CELL_AS_ARRAY_ARGS: RecordSchema = RecordSchema {
    name: "ClientService_offer_cell_as_array_args",
    fields: &[
        FieldSpec::optional(1, "ns", TypeDesc::I64),
        FieldSpec::optional(2, "table_name", TypeDesc::String),
        FieldSpec::optional(3, "mutate_spec", TypeDesc::Struct(&MUTATE_SPEC)),
        FieldSpec::optional(4, "cell", TypeDesc::List(&STRING_T)),
    ],
};
pub static OFFER_CELL_AS_ARRAY_RESULT: RecordSchema =
    RecordSchema { name: "ClientService_offer_cell_as_array_result", fields: &VOID_RESULT_FIELDS };
