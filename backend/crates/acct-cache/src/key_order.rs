/// Select one page of IDs from raw cache keys in ascending numeric order.
///
/// Keys that are not decimal IDs are ignored.
pub fn numeric_page<I, S>(keys: I, limit: usize, offset: usize) -> Vec<i64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ids: Vec<i64> = keys
        .into_iter()
        .filter_map(|key| key.as_ref().parse::<i64>().ok())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter().skip(offset).take(limit).collect()
}
