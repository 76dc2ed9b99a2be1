/// E-mails allowed into the admin API. An empty list admits every
/// authenticated user.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList(pub Vec<String>);

impl AdminAllowList {
    pub fn permits(&self, email: &str) -> bool {
        self.0.is_empty() || self.0.iter().any(|allowed| allowed.eq_ignore_ascii_case(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_admits_everyone() {
        assert!(AdminAllowList::default().permits("anyone@example.com"));
    }

    #[test]
    fn listed_emails_match_case_insensitively() {
        let list = AdminAllowList(vec!["admin@example.com".into()]);
        assert!(list.permits("Admin@Example.com"));
        assert!(!list.permits("intruder@example.com"));
    }
}
