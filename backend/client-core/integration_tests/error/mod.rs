mod flow;
mod request;
