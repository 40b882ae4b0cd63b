mod create;
mod degraded;
mod list;
