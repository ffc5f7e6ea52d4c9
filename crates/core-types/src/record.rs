/// A row shape that knows its own column order.
///
/// `COLUMNS` lists the column names in the order the producing query selects
/// them, and `cells` renders the values in that same order. NULLs render as an
/// empty string.
pub trait Record {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

pub(crate) fn opt_cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
