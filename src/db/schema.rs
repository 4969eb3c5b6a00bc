//! SQL DDL for the contact table (MySQL).

/// Single idempotent statement:
/// - `id` INT AUTO_INCREMENT PRIMARY KEY
/// - `nome`, `email` bounded VARCHAR(255)
/// - `mensagem` unbounded TEXT
/// - `created_at` assigned by the server at insert time
pub const MYSQL_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS contatos (
    id INT AUTO_INCREMENT PRIMARY KEY,
    nome VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    mensagem TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const INSERT_CONTACT: &str = "INSERT INTO contatos (nome, email, mensagem) VALUES (?, ?, ?)";

pub const PROBE: &str = "SELECT 1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_a_single_idempotent_statement() {
        assert!(MYSQL_INIT.contains("CREATE TABLE IF NOT EXISTS contatos"));
        assert!(!MYSQL_INIT.trim().trim_end_matches(';').contains(';'));
    }

    #[test]
    fn insert_binds_every_field() {
        assert_eq!(INSERT_CONTACT.matches('?').count(), 3);
    }
}
