/// Field layout and presentation strings for one deployment of the engine.
///
/// The engine itself only knows about ordered string fields; everything
/// collection-specific (path segment, labels, which field names a record in
/// confirmation messages, whether `/add` without params appends a canned
/// record) lives here.
pub struct Schema {
    /// Path segment the listing answers on, e.g. `contacts` for `GET /contacts`.
    pub collection: &'static str,
    /// Singular label used in confirmation messages, e.g. `Contact`.
    pub label: &'static str,
    /// Ordered field names; records hold one string per entry.
    pub fields: &'static [&'static str],
    /// Index of a name-like field quoted in add/remove confirmations.
    pub name_field: Option<usize>,
    /// Record appended by `/add` when no usable field params arrive.
    pub placeholder: Option<&'static [&'static str]>,
}

impl Schema {
    pub fn contacts() -> Self {
        return Schema {
            collection: "contacts",
            label: "Contact",
            fields: &["name", "phone"],
            name_field: Some(0),
            placeholder: None,
        };
    }

    pub fn notes() -> Self {
        return Schema {
            collection: "notes",
            label: "Note",
            fields: &["text"],
            name_field: None,
            placeholder: Some(&["New note"]),
        };
    }

    /// "Name and phone are required" / "Text is required"
    pub fn required_message(&self) -> String {
        let verb = if self.fields.len() > 1 { "are" } else { "is" };
        return format!("{} {} required", self.field_list(" and "), verb);
    }

    /// "Name or phone required" / "Text required"
    pub fn edit_required_message(&self) -> String {
        return format!("{} required", self.field_list(" or "));
    }

    fn field_list(&self, separator: &str) -> String {
        let mut out = String::new();
        for (i, field) in self.fields.iter().enumerate() {
            if i == 0 {
                out.push_str(&capitalize(field));
            } else {
                out.push_str(separator);
                out.push_str(field);
            }
        }
        return out;
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    return match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
}

/// One row of the store: string fields parallel to the schema's field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        return Record { fields };
    }

    pub fn from_slice(fields: &[&str]) -> Self {
        return Record {
            fields: fields.iter().map(|f| (*f).to_owned()).collect(),
        };
    }

    pub fn field(&self, index: usize) -> &str {
        return &self.fields[index];
    }

    pub fn fields(&self) -> &[String] {
        return &self.fields;
    }

    pub fn set_field(&mut self, index: usize, value: String) {
        self.fields[index] = value;
    }
}

/// The ordered in-memory record sequence. A record's identity is its
/// position: removing record `i` shifts every later record down by one.
/// Lives exactly as long as the process; starts empty.
#[derive(Default)]
pub struct Store {
    records: Vec<Record>,
}

impl Store {
    pub fn add(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Removes and returns the record at `index`, or `None` when the index
    /// is outside `[0, len)`.
    pub fn remove(&mut self, index: usize) -> Option<Record> {
        if index >= self.records.len() {
            return None;
        }
        return Some(self.records.remove(index));
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        return self.records.get_mut(index);
    }

    pub fn len(&self) -> usize {
        return self.records.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.records.is_empty();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        return self.records.iter();
    }
}
