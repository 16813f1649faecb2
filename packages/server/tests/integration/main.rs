mod blog;
mod cascade;
mod common;
mod user;
