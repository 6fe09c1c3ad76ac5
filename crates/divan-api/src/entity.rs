use std::fmt;

/// Remote collections, one base URL each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Products,
    Orders,
    Users,
    Reviews,
    Bookings,
    Favorites,
}

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::Products,
        Entity::Orders,
        Entity::Users,
        Entity::Reviews,
        Entity::Bookings,
        Entity::Favorites,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Products => "products",
            Entity::Orders => "orders",
            Entity::Users => "users",
            Entity::Reviews => "reviews",
            Entity::Bookings => "bookings",
            Entity::Favorites => "favorites",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
