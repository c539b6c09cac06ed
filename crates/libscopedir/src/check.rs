/// Return the contained value, or `error` when `value` is absent.
///
/// A precondition guard for call sites that already hold the error they want
/// to raise: `let conn = require(pool.get(name), PoolError::Missing)?;`. Pure;
/// nothing is logged.
pub fn require<T, E>(value: Option<T>, error: E) -> Result<T, E> {
    match value {
        Some(value) => Ok(value),
        None => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::require;

    #[test]
    fn present_values_pass_through() {
        assert_eq!(require(Some(7), "missing"), Ok(7));
    }

    #[test]
    fn absent_values_raise_the_prepared_error() {
        assert_eq!(require(None::<i32>, "missing"), Err("missing"));
    }
}
