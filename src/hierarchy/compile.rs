//! Compilation entry points: capability gate, then dialect emitter.

use super::capability::{self, Version};
use super::emit::HierarchySql;
use super::error::HierarchyResult;
use super::request::HierarchyRequest;
use crate::sql::dialect::Dialect;

/// Compile `request` for the dialect a connection reports by name.
///
/// Fails with `UnsupportedDialect` for names without a capability row and
/// with `DialectVersionTooLow` below the dialect's minimum version.
pub fn compile(
    request: &HierarchyRequest,
    dialect: &str,
    version: Version,
) -> HierarchyResult<HierarchySql> {
    let capability = capability::check_dialect(dialect, version)?;
    log::debug!(
        "compiling hierarchy on {} for {} {version}",
        request.table_name(),
        capability.name
    );
    Ok(capability.emitter.emit(request))
}

/// Compile `request` for a known dialect.
pub fn compile_for(
    request: &HierarchyRequest,
    dialect: Dialect,
    version: Version,
) -> HierarchyResult<HierarchySql> {
    let capability = capability::check(dialect, version)?;
    log::debug!(
        "compiling hierarchy on {} for {} {version}",
        request.table_name(),
        capability.name
    );
    Ok(capability.emitter.emit(request))
}
