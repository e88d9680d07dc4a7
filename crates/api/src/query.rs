//! Query parameter types for API handlers.

/// Query parameters for `GET /todos` (`?completed=&window=`).
///
/// Both are kept as raw strings: `completed` has its own truthiness rule and
/// a malformed `window` must surface as a JSON client error rather than an
/// extractor rejection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TodoListParams {
    pub completed: Option<String>,
    pub window: Option<String>,
}

impl TodoListParams {
    /// Build from decoded query pairs. A repeated key keeps its first value;
    /// unrelated keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "completed" => &mut params.completed,
                "window" => &mut params.window,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}
