use std::collections::HashMap;

use cardfile_parser::query_parser::parse_query;
use cardfile_parser::request_parser::Method;

use crate::response::{Response, Status};
use crate::store::{Record, Schema, Store};

/// Owns the store and dispatches parsed requests against it. Rules are
/// checked in a fixed order and the first match wins; everything that
/// matches nothing is a 404.
pub struct Router {
    schema: Schema,
    store: Store,
}

impl Router {
    pub fn new(schema: Schema) -> Self {
        return Router {
            schema,
            store: Store::default(),
        };
    }

    pub fn route(&mut self, method: Method, target: &str) -> Response {
        if method == Method::Get && self.is_listing_target(target) {
            return Response::listing(&self.schema, &self.store);
        }
        if method == Method::Post && target.starts_with("/add") {
            return self.handle_add(target);
        }
        if method == Method::Post && target.starts_with("/remove") {
            return self.handle_remove(target);
        }
        if method == Method::Post && target.starts_with("/edit") {
            return self.handle_edit(target);
        }
        return Response::status_page(Status::NotFound, "Not Found");
    }

    /// Exact match only; a listing target carrying a query string is a miss.
    fn is_listing_target(&self, target: &str) -> bool {
        return target
            .strip_prefix('/')
            .is_some_and(|rest| rest == self.schema.collection);
    }

    fn handle_add(&mut self, target: &str) -> Response {
        let params = parse_query(target);

        let mut fields = Vec::with_capacity(self.schema.fields.len());
        for name in self.schema.fields {
            match params.get(*name) {
                Some(value) if !value.is_empty() => fields.push(value.clone()),
                _ => {
                    // Note-style deployments fall back to a canned record
                    // instead of rejecting a bare /add.
                    if let Some(placeholder) = self.schema.placeholder {
                        self.store.add(Record::from_slice(placeholder));
                        return Response::status_page(
                            Status::Ok,
                            &format!("{} added", self.schema.label),
                        );
                    }
                    return Response::status_page(
                        Status::BadRequest,
                        &self.schema.required_message(),
                    );
                }
            }
        }

        let record = Record::new(fields);
        let message = match self.schema.name_field {
            Some(i) => format!("{} added: {}", self.schema.label, record.field(i)),
            None => format!("{} added", self.schema.label),
        };
        self.store.add(record);
        return Response::status_page(Status::Ok, &message);
    }

    fn handle_remove(&mut self, target: &str) -> Response {
        let params = parse_query(target);

        if self.store.is_empty() {
            return Response::status_page(
                Status::BadRequest,
                &format!("No {} to remove", self.schema.collection),
            );
        }

        let index = parse_index(&params);
        let removed = match usize::try_from(index).ok().and_then(|i| self.store.remove(i)) {
            Some(record) => record,
            None => return Response::status_page(Status::BadRequest, "Invalid index"),
        };

        let message = match self.schema.name_field {
            Some(i) => format!("{} removed: {}", self.schema.label, removed.field(i)),
            None => format!("{} removed", self.schema.label),
        };
        return Response::status_page(Status::Ok, &message);
    }

    fn handle_edit(&mut self, target: &str) -> Response {
        let params = parse_query(target);

        let index = parse_index(&params);
        let record = match usize::try_from(index).ok().and_then(|i| self.store.get_mut(i)) {
            Some(record) => record,
            None => return Response::status_page(Status::BadRequest, "Invalid index"),
        };

        // Only supplied non-empty fields overwrite; the rest keep their
        // prior value.
        let mut changed = false;
        for (i, name) in self.schema.fields.iter().enumerate() {
            if let Some(value) = params.get(*name) {
                if !value.is_empty() {
                    record.set_field(i, value.clone());
                    changed = true;
                }
            }
        }

        if !changed {
            return Response::status_page(Status::BadRequest, &self.schema.edit_required_message());
        }
        return Response::status_page(Status::Ok, &format!("{} updated", self.schema.label));
    }

    pub fn store(&self) -> &Store {
        return &self.store;
    }
}

/// An absent or non-numeric index parses to -1 so that "missing" and
/// "garbage" fail the bounds check through the same path.
fn parse_index(params: &HashMap<String, String>) -> i64 {
    return params
        .get("index")
        .and_then(|value| value.parse().ok())
        .unwrap_or(-1);
}
