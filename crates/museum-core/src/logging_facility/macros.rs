//! Canonical logging macros
//!
//! Each macro stamps `component` with the calling module and `event` with one
//! of the canonical event names. Operations on a single entity pass its
//! `EntityKey` as `key = ...`, which is recorded as `entity_kind` and
//! `entity_id`.

/// Log the start of an operation
///
/// ```ignore
/// # use museum_core::log_op_start;
/// use museum_core::model::{EntityKey, EntityKind};
///
/// log_op_start!("list_museums");
/// log_op_start!("find_museum", key = EntityKey::new(EntityKind::Museum, 4));
/// log_op_start!("query_by_name", name = "Getty Center");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, key = $key:expr) => {{
        let key: $crate::model::EntityKey = $key;
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_START,
            entity_kind = key.kind.name(),
            entity_id = key.id,
        );
    }};
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```ignore
/// # use museum_core::log_op_end;
/// use museum_core::model::{EntityKey, EntityKind};
///
/// log_op_end!("list_museums", duration_ms = 3, rows = 2);
/// log_op_end!("find_museum", key = EntityKey::new(EntityKind::Museum, 4), duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, key = $key:expr, duration_ms = $duration:expr) => {{
        let key: $crate::model::EntityKey = $key;
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_END,
            duration_ms = $duration,
            entity_kind = key.kind.name(),
            entity_id = key.id,
        );
    }};
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that ended in an error
///
/// Accepts anything convertible into `ExError`. The entity the error names,
/// if any, is recorded as `entity_kind`/`entity_id`.
///
/// ```ignore
/// # use museum_core::{log_op_error, errors::MuseumError};
/// use museum_core::model::EntityKind;
///
/// let err = MuseumError::NotFound { kind: EntityKind::Museum, id: 4 };
/// log_op_error!("navigate", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = museum_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            entity_kind = ex_err.entity_kind().map(|k| k.name()),
            entity_id = ex_err.entity_id(),
            $($field)*
        );
    }};
}
