pub mod ftp_server;
pub mod http_server;
