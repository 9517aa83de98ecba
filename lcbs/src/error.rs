use facet::Facet;

/// Errors that can occur while parsing sequences or computing similarity.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum Error {
    /// memo table for {codes} distinct sequences needs {entries} entries, over the budget of {budget_bytes} bytes
    MemoBudgetExceeded {
        codes: usize,
        entries: usize,
        budget_bytes: usize,
    },

    /// character at position {position} is neither '0' nor '1'
    InvalidBit { position: usize },

    /// closing bit at position {position} has no matching opening bit
    UnmatchedClose { position: usize },

    /// sequence ends with {open} unclosed opening bits
    UnclosedOpen { open: usize },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
