pub mod async_queued_logger;
