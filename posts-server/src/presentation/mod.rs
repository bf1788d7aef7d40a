pub mod http_handlers;
