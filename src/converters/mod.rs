pub mod chronos_to_prometheus;
