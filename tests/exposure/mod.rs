mod environment;
mod table;
