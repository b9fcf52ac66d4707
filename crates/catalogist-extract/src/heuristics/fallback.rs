use crate::error::Result;

type Strategy<'a> = Box<dyn FnOnce() -> Result<String> + 'a>;

/// Ordered strategies for one field, tried until one yields a non-empty value.
pub struct FallbackChain<'a> {
    field: &'static str,
    strategies: Vec<(&'static str, Strategy<'a>)>,
}

impl<'a> FallbackChain<'a> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    pub fn then(
        mut self,
        name: &'static str,
        strategy: impl FnOnce() -> Result<String> + 'a,
    ) -> Self {
        self.strategies.push((name, Box::new(strategy)));
        self
    }

    /// Value of the first strategy that produced something, or `""`.
    pub fn resolve(self) -> Result<String> {
        for (name, strategy) in self.strategies {
            let value = strategy()?;
            if !value.is_empty() {
                tracing::debug!(field = self.field, strategy = name, "field resolved");
                return Ok(value);
            }
        }
        tracing::debug!(field = self.field, "no strategy produced a value");
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_first_non_empty_wins() {
        let value = FallbackChain::new("inventory_number")
            .then("unitid", || Ok(String::new()))
            .then("file_name", || Ok("ARS0042".to_string()))
            .then("never", || Ok("unused".to_string()))
            .resolve()
            .unwrap();
        assert_eq!(value, "ARS0042");
    }

    #[test]
    fn test_later_strategies_are_not_run() {
        let calls = Cell::new(0);
        let value = FallbackChain::new("title")
            .then("primary", || Ok("Found".to_string()))
            .then("secondary", || {
                calls.set(calls.get() + 1);
                Ok("Other".to_string())
            })
            .resolve()
            .unwrap();
        assert_eq!(value, "Found");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_exhausted_chain_is_empty() {
        let value = FallbackChain::new("url")
            .then("a", || Ok(String::new()))
            .then("b", || Ok(String::new()))
            .resolve()
            .unwrap();
        assert_eq!(value, "");
    }
}
