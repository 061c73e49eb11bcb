use casebook_types::{Account, DirectoryView, User};

/// The known users and accounts. Case owners and accounts always come from here.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<User>,
    accounts: Vec<Account>,
}

impl Directory {
    pub fn new(users: Vec<User>, accounts: Vec<Account>) -> Self {
        Self { users, accounts }
    }

    pub fn users(&self) -> &[User] { &self.users }

    pub fn accounts(&self) -> &[Account] { &self.accounts }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn view(&self) -> DirectoryView {
        DirectoryView { users: self.users.clone(), accounts: self.accounts.clone() }
    }
}
