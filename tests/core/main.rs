mod context;
mod source;
