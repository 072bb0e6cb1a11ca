pub mod block_extractor;
pub mod block_orderer;
pub mod cell;
pub mod green_cluster;
pub mod grid;
pub mod grid_sampler;
pub mod reachability;
pub mod region_scanner;
