mod api;
mod session_flow;
