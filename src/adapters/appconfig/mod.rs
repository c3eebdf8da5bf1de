pub mod http_client;
#[cfg(test)]
pub mod in_memory;
