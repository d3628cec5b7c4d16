use std::collections::HashMap;

use crate::vm::Segment;

/// Storage class of a resolved identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Field,
    Static,
    Local,
    Argument,
}

impl Storage {
    /// The memory segment variables of this storage class live in.
    pub fn segment(&self) -> Segment {
        match self {
            Storage::Field => Segment::This,
            Storage::Static => Segment::Static,
            Storage::Local => Segment::Local,
            Storage::Argument => Segment::Argument,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub ty: String,
    pub storage: Storage,
    pub index: u16,
}

/// Two-tier symbol table: the class scope lives for a whole compilation, the
/// subroutine scope is thrown away at every subroutine boundary.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class_table: HashMap<String, SymbolEntry>,
    subroutine_table: HashMap<String, SymbolEntry>,
    field_count: u16,
    static_count: u16,
    local_count: u16,
    argument_count: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the subroutine scope. Methods get their receiver predefined as
    /// argument 0, typed with the surrounding class.
    pub fn start_subroutine(&mut self, is_method: bool, class_name: &str) {
        self.subroutine_table.clear();
        self.local_count = 0;
        self.argument_count = 0;

        if is_method {
            self.define("this", class_name, Storage::Argument);
        }
    }

    /// Check whether `name` is already present in the scope that `storage`
    /// belongs to.
    pub fn contains_in_scope(&self, name: &str, storage: Storage) -> bool {
        match storage {
            Storage::Field | Storage::Static => self.class_table.contains_key(name),
            Storage::Local | Storage::Argument => self.subroutine_table.contains_key(name),
        }
    }

    /// Define `name` under the next free index of its storage class and
    /// return that index.
    pub fn define(&mut self, name: &str, ty: &str, storage: Storage) -> u16 {
        let counter = match storage {
            Storage::Field => &mut self.field_count,
            Storage::Static => &mut self.static_count,
            Storage::Local => &mut self.local_count,
            Storage::Argument => &mut self.argument_count,
        };

        let index = *counter;
        *counter += 1;

        let entry = SymbolEntry {
            ty: ty.to_owned(),
            storage,
            index,
        };

        match storage {
            Storage::Field | Storage::Static => self.class_table.insert(name.to_owned(), entry),
            Storage::Local | Storage::Argument => {
                self.subroutine_table.insert(name.to_owned(), entry)
            }
        };

        index
    }

    pub fn count(&self, storage: Storage) -> u16 {
        match storage {
            Storage::Field => self.field_count,
            Storage::Static => self.static_count,
            Storage::Local => self.local_count,
            Storage::Argument => self.argument_count,
        }
    }

    /// Find an entry by name, consulting the subroutine scope before the
    /// class scope. An unresolved name is not an error here; the parser
    /// treats absence as "class name in a qualified call".
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.subroutine_table
            .get(name)
            .or_else(|| self.class_table.get(name))
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|entry| entry.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.get(name).map(|entry| entry.index)
    }

    pub fn segment_of(&self, name: &str) -> Option<Segment> {
        self.get(name).map(|entry| entry.storage.segment())
    }
}
