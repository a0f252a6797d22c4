//! End-to-end checks of the client against the in-memory server

#[cfg(test)]
mod fixture;

#[cfg(test)]
mod catalogs;
#[cfg(test)]
mod comments;
#[cfg(test)]
mod details;
#[cfg(test)]
mod task_list;
