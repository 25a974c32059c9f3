use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::CustomerDraft;

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Henry",
];
const LAST_NAMES: &[&str] = &[
    "Doe", "Smith", "Johnson", "Brown", "Williams", "Jones", "Garcia", "Martinez", "Hernandez",
    "Lopez",
];

const DEMO_PHONE: &str = "1234567890";
const DEMO_ADDRESS: &str = "123 Main St";

/// Random demo customer. The email is derived from the name, so repeated
/// draws can collide with customers that already exist at the provider.
pub fn random_customer<R: Rng + ?Sized>(rng: &mut R) -> CustomerDraft {
    let first_name = FIRST_NAMES.choose(rng).copied().unwrap_or("John");
    let last_name = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");

    CustomerDraft {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!(
            "{}.{}@gmail.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        phone: DEMO_PHONE.to_string(),
        address: DEMO_ADDRESS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::check_fields;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_customer_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let draft = random_customer(&mut rng);
            assert_eq!(check_fields(&draft), Ok(()));
            assert!(FIRST_NAMES.contains(&draft.first_name.as_str()));
            assert!(LAST_NAMES.contains(&draft.last_name.as_str()));
            assert_eq!(
                draft.email,
                format!(
                    "{}.{}@gmail.com",
                    draft.first_name.to_lowercase(),
                    draft.last_name.to_lowercase()
                )
            );
        }
    }

    #[test]
    fn test_same_seed_same_customer() {
        let a = random_customer(&mut StdRng::seed_from_u64(42));
        let b = random_customer(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
