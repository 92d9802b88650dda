/// Discriminated result of a marketplace action.
///
/// Hard failures (store unreachable, broken invariants) travel as `Err`;
/// a missing target or a business conflict is reported here so callers never
/// have to guess what an empty result meant.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    Ok(T),
    NotFound(String),
    Conflict(String),
}

impl<T> ActionOutcome<T> {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_ok(&self) -> bool { matches!(self, ActionOutcome::Ok(_)) }

    pub fn ok(self) -> Option<T> {
        match self {
            ActionOutcome::Ok(v) => Some(v),
            _ => None,
        }
    }
}
