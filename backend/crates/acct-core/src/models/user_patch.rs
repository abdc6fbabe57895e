use crate::Role;

/// Partial update. Absent or empty fields are left untouched; `updated_at` always moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// An empty name means "keep the current one".
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    /// An empty email means "keep the current one".
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = non_empty(email.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Names of the fields carried by this patch, in column order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::with_capacity(3);
        if self.name.is_some() {
            fields.push("name");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        fields
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
