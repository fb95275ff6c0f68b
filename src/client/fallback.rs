//! Ordered, single-pass fallback over candidate endpoints.

/// Try each candidate in order until one succeeds.
///
/// `attempt` receives the candidate's position and the candidate itself.
/// Candidates are attempted strictly one after another and at most once;
/// nothing after the first success is touched. On success the winning
/// position is returned with the value, otherwise every error in order.
///
/// # Example
///
/// ```
/// use people_lookup_mcp::client::try_in_order;
///
/// let hosts = ["down", "up", "never-tried"];
/// let result = try_in_order(hosts, |_, host| {
///     if host == "up" { Ok(host.len()) } else { Err(host) }
/// });
/// assert_eq!(result, Ok((1, 2)));
/// ```
pub fn try_in_order<C, T, E, F>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Result<(usize, T), Vec<E>>
where
    F: FnMut(usize, C) -> Result<T, E>,
{
    let mut failures = Vec::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        match attempt(index, candidate) {
            Ok(value) => return Ok((index, value)),
            Err(err) => failures.push(err),
        }
    }
    Err(failures)
}
