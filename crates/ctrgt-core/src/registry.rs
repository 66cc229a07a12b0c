//! Entity registry
//!
//! Static description of every collection: storage name, public route name,
//! identifier policy and legal field set. Generic CRUD and snapshot code
//! consult the registry instead of carrying per-entity column lists, and the
//! registry is the only source of identifiers that reach statement text.

use crate::errors::RecordError;
use crate::model::record::ID_FIELD;
use crate::model::Record;

pub const TRANSACTIONS: &str = "transactions";
pub const CATEGORIES: &str = "categories";
pub const INVENTORY: &str = "inventory";
pub const MOVEMENTS: &str = "input_and_output_products";
pub const USERS: &str = "users";

/// Inventory column adjusted by stock movements
pub const STOCK_FIELD: &str = "currentStock";

// Movement ledger columns
pub const MOVEMENT_PRODUCT_FIELD: &str = "productId";
pub const MOVEMENT_QTY_FIELD: &str = "qty";
pub const MOVEMENT_DIRECTION_FIELD: &str = "tipo";
pub const MOVEMENT_DATE_FIELD: &str = "date";

// User columns the identity service reads or defaults
pub const USERNAME_FIELD: &str = "username";
pub const USER_GROUP_FIELD: &str = "user_group";
pub const USER_ACTIVE_FIELD: &str = "is_active";

/// How a new record's identifier is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// SQLite `AUTOINCREMENT` assigns an integer key
    StoreAssigned,
    /// The service synthesizes `<prefix>_<millis>_<suffix>`
    Generated { prefix: &'static str },
}

/// Description of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Table name
    pub name: &'static str,
    /// Name exposed to callers; differs from `name` only for movements
    pub route: &'static str,
    pub id_policy: IdPolicy,
    /// Every column, `id` included
    pub fields: &'static [&'static str],
    /// Column stamped with the creation instant on create, if any
    pub created_at_field: Option<&'static str>,
    /// Column holding the credential; never projected to callers
    pub credential_field: Option<&'static str>,
    pub updatable: bool,
    pub deletable: bool,
}

impl Entity {
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Reject any field outside the collection's column set
    pub fn check_fields(&self, record: &Record) -> Result<(), RecordError> {
        match record.keys().find(|field| !self.has_field(field)) {
            Some(field) => Err(RecordError::UnknownField {
                collection: self.name.to_string(),
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Columns safe to return to callers
    pub fn public_columns(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .copied()
            .filter(|f| Some(*f) != self.credential_field)
            .collect()
    }

    pub fn id_prefix(&self) -> Option<&'static str> {
        match self.id_policy {
            IdPolicy::Generated { prefix } => Some(prefix),
            IdPolicy::StoreAssigned => None,
        }
    }

    pub fn is_store_assigned(&self) -> bool {
        self.id_policy == IdPolicy::StoreAssigned
    }

    /// Remove the credential field from a record bound for a caller
    pub fn redact(&self, record: &mut Record) {
        if let Some(field) = self.credential_field {
            record.remove(field);
        }
    }
}

static TRANSACTIONS_ENTITY: Entity = Entity {
    name: TRANSACTIONS,
    route: TRANSACTIONS,
    id_policy: IdPolicy::Generated { prefix: "tran" },
    fields: &[
        ID_FIELD,
        "description",
        "amount",
        "date",
        "type",
        "categoryId",
        "isRecurring",
        "createdAt",
        "vencimento",
        "isDone",
    ],
    created_at_field: Some("createdAt"),
    credential_field: None,
    updatable: true,
    deletable: true,
};

static CATEGORIES_ENTITY: Entity = Entity {
    name: CATEGORIES,
    route: CATEGORIES,
    id_policy: IdPolicy::Generated { prefix: "cate" },
    fields: &[ID_FIELD, "name", "type", "color", "icon"],
    created_at_field: None,
    credential_field: None,
    updatable: true,
    deletable: true,
};

static INVENTORY_ENTITY: Entity = Entity {
    name: INVENTORY,
    route: INVENTORY,
    id_policy: IdPolicy::Generated { prefix: "inve" },
    fields: &[
        ID_FIELD,
        "name",
        STOCK_FIELD,
        "minStock",
        "maxStock",
        "unit",
        "category",
        "createdAt",
    ],
    created_at_field: Some("createdAt"),
    credential_field: None,
    updatable: true,
    deletable: true,
};

static MOVEMENTS_ENTITY: Entity = Entity {
    name: MOVEMENTS,
    route: "movements",
    id_policy: IdPolicy::Generated { prefix: "prod" },
    fields: &[
        ID_FIELD,
        MOVEMENT_PRODUCT_FIELD,
        MOVEMENT_QTY_FIELD,
        "destination",
        MOVEMENT_DATE_FIELD,
        "value",
        MOVEMENT_DIRECTION_FIELD,
    ],
    created_at_field: None,
    credential_field: None,
    updatable: false,
    deletable: true,
};

static USERS_ENTITY: Entity = Entity {
    name: USERS,
    route: USERS,
    id_policy: IdPolicy::StoreAssigned,
    fields: &[
        ID_FIELD,
        USERNAME_FIELD,
        "password_hash",
        "email",
        USER_GROUP_FIELD,
        USER_ACTIVE_FIELD,
        "created_at",
    ],
    created_at_field: Some("created_at"),
    credential_field: Some("password_hash"),
    updatable: false,
    deletable: false,
};

static ENTITIES: [&Entity; 5] = [
    &TRANSACTIONS_ENTITY,
    &CATEGORIES_ENTITY,
    &INVENTORY_ENTITY,
    &MOVEMENTS_ENTITY,
    &USERS_ENTITY,
];

/// Read-only view over the collection descriptions
#[derive(Debug, Clone, Copy)]
pub struct EntityRegistry {
    entities: &'static [&'static Entity],
}

impl EntityRegistry {
    /// The five collections of the application
    pub fn standard() -> Self {
        Self {
            entities: &ENTITIES,
        }
    }

    /// Resolve a storage name or route name
    pub fn lookup(&self, name: &str) -> Result<&'static Entity, RecordError> {
        self.entities
            .iter()
            .copied()
            .find(|e| e.name == name || e.route == name)
            .ok_or_else(|| RecordError::UnknownCollection {
                name: name.to_string(),
            })
    }

    /// Collections in snapshot order (users last)
    pub fn entities(&self) -> impl Iterator<Item = &'static Entity> {
        self.entities.iter().copied()
    }

    pub fn users(&self) -> &'static Entity {
        &USERS_ENTITY
    }

    pub fn movements(&self) -> &'static Entity {
        &MOVEMENTS_ENTITY
    }

    pub fn inventory(&self) -> &'static Entity {
        &INVENTORY_ENTITY
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
