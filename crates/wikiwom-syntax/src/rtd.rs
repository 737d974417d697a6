//! Round-trip data: the literal glue printed around a node's child slots.
//!
//! For a node with `n` children the record holds `n + 1` strings. The printer
//! emits `slot[0]`, child 0, `slot[1]`, child 1, ... `slot[n]`. A bold node
//! parsed from `'''x'''` therefore carries `["'''", "'''"]`.

/// Ordered glue strings interleaved with a node's children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RtData {
    slots: Vec<String>,
}

impl RtData {
    /// Build a record from its glue slots.
    ///
    /// ```
    /// use wikiwom_syntax::RtData;
    ///
    /// let rtd = RtData::from_slots(["'''", "'''"]);
    /// assert_eq!(rtd.len(), 2);
    /// ```
    pub fn from_slots<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total length of the glue, for diagnostics.
    pub fn glue_len(&self) -> usize {
        self.slots.iter().map(String::len).sum()
    }
}
