/// Health of the connection to the server, as seen by the observer.
pub trait LinkStatus {
    /// Whether the client has outrun the server far enough that it should
    /// stop advancing time until acknowledgements catch up.
    fn is_backlogged(&self) -> bool;
}
