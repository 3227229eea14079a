/// River-network graph construction and traversal.
///
/// The network is a directed graph of stream segments: an edge A → B means
/// segment A drains into segment B. `topology` builds the forward and
/// reverse adjacency mappings; `upstream` walks the reverse mapping to
/// collect everything draining into a target basin.

pub mod topology;
pub mod upstream;
