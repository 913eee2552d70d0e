//! hypertable/client.rs
//!
//! Typed client for the HQL and client services.
//!
//! Each method builds its args record, runs one call through `RpcClient`
//! and converts the outcome. A set `e` slot becomes `HqlError::Client`.

use std::io::{Read, Write};

use thiserror::Error;

use crate::config::ClientConfig;
use crate::hypertable::service::*;
use crate::hypertable::types::MutatorFlags;
use crate::hypertable::views::{Cell, ClientException, HqlResult, HqlResultArrays, MutateSpec};
use crate::protocol::{BinaryReader, BinaryWriter, WireReader, WireWriter};
use crate::record::{FromRecord, IntoRecord, Record, RecordError, RecordType, Value};
use crate::rpc::{CallOutcome, MethodSpec, RpcClient, RpcError};
use crate::telemetry::TelemetryCounters;

#[derive(Debug, Error)]
pub enum HqlError {
    /// Declared exception raised by the broker.
    #[error(transparent)]
    Client(#[from] ClientException),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Reply decoded but does not fit the typed view.
    #[error(transparent)]
    Record(#[from] RecordError),
}

#[derive(Debug)]
pub struct HqlClient<R, W> {
    rpc: RpcClient<R, W>,
}

impl<R: Read, W: Write> HqlClient<BinaryReader<R>, BinaryWriter<W>> {
    /// Binary-protocol client over caller-supplied streams.
    pub fn from_io(input: R, output: W, config: &ClientConfig) -> Self {
        Self { rpc: RpcClient::from_io(input, output, config) }
    }
}

impl<R: WireReader, W: WireWriter> HqlClient<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { rpc: RpcClient::new(reader, writer) }
    }

    pub fn rpc(&self) -> &RpcClient<R, W> {
        &self.rpc
    }

    pub fn rpc_mut(&mut self) -> &mut RpcClient<R, W> {
        &mut self.rpc
    }

    pub fn counters(&self) -> &TelemetryCounters {
        self.rpc.counters()
    }

    pub fn into_inner(self) -> RpcClient<R, W> {
        self.rpc
    }

    fn invoke(&mut self, method: &MethodSpec, args: Record) -> Result<Option<Value>, HqlError> {
        match self.rpc.call(method, &args)? {
            CallOutcome::Success(value) => Ok(value),
            CallOutcome::Failure(remote) if remote.type_name() == ClientException::schema().name => {
                Err(remote.decode_as::<ClientException>()?.into())
            }
            CallOutcome::Failure(remote) => Err(RpcError::Remote(remote).into()),
        }
    }

    fn invoke_record<T: FromRecord>(&mut self, method: &MethodSpec, args: Record) -> Result<T, HqlError> {
        match self.invoke(method, args)? {
            Some(Value::Struct(record)) => Ok(T::from_record(&record)?),
            _ => Err(RpcError::UnknownResult { method: method.name }.into()),
        }
    }

    fn invoke_void(&mut self, method: &MethodSpec, args: Record) -> Result<(), HqlError> {
        self.invoke(method, args).map(drop)
    }

    // --- HqlService --------------------------------------------------------------

    pub fn hql_exec(&mut self, ns: i64, command: &str, noflush: bool, unbuffered: bool) -> Result<HqlResult, HqlError> {
        let args = hql_exec_args(&HQL_EXEC, ns, command, noflush, unbuffered)?;
        self.invoke_record(&HQL_EXEC, args)
    }

    pub fn hql_query(&mut self, ns: i64, command: &str) -> Result<HqlResult, HqlError> {
        let args = hql_query_args(&HQL_QUERY, ns, command)?;
        self.invoke_record(&HQL_QUERY, args)
    }

    pub fn hql_exec2(&mut self, ns: i64, command: &str, noflush: bool, unbuffered: bool) -> Result<HqlResultArrays, HqlError> {
        let args = hql_exec_args(&HQL_EXEC2, ns, command, noflush, unbuffered)?;
        self.invoke_record(&HQL_EXEC2, args)
    }

    pub fn hql_query2(&mut self, ns: i64, command: &str) -> Result<HqlResultArrays, HqlError> {
        let args = hql_query_args(&HQL_QUERY2, ns, command)?;
        self.invoke_record(&HQL_QUERY2, args)
    }

    pub fn hql_exec_as_arrays(
        &mut self,
        ns: i64,
        command: &str,
        noflush: bool,
        unbuffered: bool,
    ) -> Result<HqlResultArrays, HqlError> {
        let args = hql_exec_args(&HQL_EXEC_AS_ARRAYS, ns, command, noflush, unbuffered)?;
        self.invoke_record(&HQL_EXEC_AS_ARRAYS, args)
    }

    pub fn hql_query_as_arrays(&mut self, ns: i64, command: &str) -> Result<HqlResultArrays, HqlError> {
        let args = hql_query_args(&HQL_QUERY_AS_ARRAYS, ns, command)?;
        self.invoke_record(&HQL_QUERY_AS_ARRAYS, args)
    }

    // --- ClientService -------------------------------------------------------------

    pub fn drop_table(&mut self, ns: i64, name: &str, if_exists: bool) -> Result<(), HqlError> {
        let args = Record::new(DROP_TABLE.args)
            .with("ns", ns)?
            .with("name", name)?
            .with("if_exists", if_exists)?;
        self.invoke_void(&DROP_TABLE, args)
    }

    pub fn get_schema_str_with_ids(&mut self, ns: i64, table_name: &str) -> Result<String, HqlError> {
        let args = Record::new(GET_SCHEMA_STR_WITH_IDS.args)
            .with("ns", ns)?
            .with("table_name", table_name)?;
        match self.invoke(&GET_SCHEMA_STR_WITH_IDS, args)? {
            Some(v) => v.as_str().map(str::to_owned).ok_or_else(|| {
                HqlError::from(RecordError::WrongType {
                    record: GET_SCHEMA_STR_WITH_IDS.result.name,
                    field: "success",
                    expected: "utf-8 string",
                })
            }),
            None => Err(RpcError::UnknownResult { method: GET_SCHEMA_STR_WITH_IDS.name }.into()),
        }
    }

    pub fn open_mutator(
        &mut self,
        ns: i64,
        table_name: &str,
        flags: MutatorFlags,
        flush_interval: i32,
    ) -> Result<i64, HqlError> {
        let args = Record::new(OPEN_MUTATOR.args)
            .with("ns", ns)?
            .with("table_name", table_name)?
            .with("flags", flags.bits())?
            .with("flush_interval", flush_interval)?;
        match self.invoke(&OPEN_MUTATOR, args)? {
            Some(Value::I64(mutator)) => Ok(mutator),
            _ => Err(RpcError::UnknownResult { method: OPEN_MUTATOR.name }.into()),
        }
    }

    pub fn set_cells_async(&mut self, mutator: i64, cells: Vec<Cell>) -> Result<(), HqlError> {
        let args = Record::new(SET_CELLS_ASYNC.args)
            .with("mutator", mutator)?
            .with("cells", Value::list(cells.into_iter().map(Cell::into_record)))?;
        self.invoke_void(&SET_CELLS_ASYNC, args)
    }

    pub fn async_mutator_close(&mut self, mutator: i64) -> Result<(), HqlError> {
        let args = Record::new(ASYNC_MUTATOR_CLOSE.args).with("mutator", mutator)?;
        self.invoke_void(&ASYNC_MUTATOR_CLOSE, args)
    }

    pub fn async_mutator_set_cells_as_arrays(&mut self, mutator: i64, cells: Vec<Vec<String>>) -> Result<(), HqlError> {
        let args = Record::new(ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS.args)
            .with("mutator", mutator)?
            .with("cells", Value::list(cells.into_iter().map(Value::list)))?;
        self.invoke_void(&ASYNC_MUTATOR_SET_CELLS_AS_ARRAYS, args)
    }

    pub fn close_scanner(&mut self, scanner: i64) -> Result<(), HqlError> {
        let args = Record::new(CLOSE_SCANNER.args).with("scanner", scanner)?;
        self.invoke_void(&CLOSE_SCANNER, args)
    }

    pub fn offer_cell_as_array(
        &mut self,
        ns: i64,
        table_name: &str,
        mutate_spec: MutateSpec,
        cell: Vec<String>,
    ) -> Result<(), HqlError> {
        let args = Record::new(OFFER_CELL_AS_ARRAY.args)
            .with("ns", ns)?
            .with("table_name", table_name)?
            .with("mutate_spec", mutate_spec.into_record())?
            .with("cell", Value::list(cell))?;
        self.invoke_void(&OFFER_CELL_AS_ARRAY, args)
    }
}

fn hql_exec_args(method: &MethodSpec, ns: i64, command: &str, noflush: bool, unbuffered: bool) -> Result<Record, RecordError> {
    Record::new(method.args)
        .with("ns", ns)?
        .with("command", command)?
        .with("noflush", noflush)?
        .with("unbuffered", unbuffered)
}

fn hql_query_args(method: &MethodSpec, ns: i64, command: &str) -> Result<Record, RecordError> {
    Record::new(method.args).with("ns", ns)?.with("command", command)
}
