//! Partitions of a population into subcommunities.

/// How a population is divided into subcommunities.
///
/// The partition only fixes the identity and order of the subcommunities;
/// their relative sizes live in the abundance matrix.
pub trait Partition {
    /// Ordered names of the subcommunities, one per abundance column.
    fn subcommunity_names(&self) -> &[String];

    /// Number of subcommunities in the partition.
    fn num_subcommunities(&self) -> usize {
        self.subcommunity_names().len()
    }
}

/// A partition into explicitly named subcommunities.
#[derive(Debug, Clone)]
pub struct Subcommunities {
    names: Vec<String>,
}

impl Subcommunities {
    /// Partition with the given subcommunity names.
    pub fn new(names: Vec<String>) -> Self {
        Subcommunities { names }
    }

    /// Partition into `count` subcommunities named "1" through "count".
    pub fn numbered(count: usize) -> Self {
        Subcommunities {
            names: (1..=count).map(|i| i.to_string()).collect(),
        }
    }
}

impl Partition for Subcommunities {
    fn subcommunity_names(&self) -> &[String] {
        &self.names
    }
}

/// The trivial partition: the whole population is one subcommunity.
#[derive(Debug, Clone)]
pub struct OneCommunity {
    names: Vec<String>,
}

impl OneCommunity {
    /// The single-subcommunity partition.
    pub fn new() -> Self {
        OneCommunity {
            names: vec![String::from("1")],
        }
    }
}

impl Default for OneCommunity {
    fn default() -> Self {
        OneCommunity::new()
    }
}

impl Partition for OneCommunity {
    fn subcommunity_names(&self) -> &[String] {
        &self.names
    }
}
