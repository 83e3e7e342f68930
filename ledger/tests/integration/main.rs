mod batching;
mod generate;
mod partial_failure;
