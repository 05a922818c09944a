use tracing::info;

use crate::contract::model::NewContact;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

const SAMPLES: &[(&str, &str, &str, &str)] = &[
    ("Shruti", "Kapoor", "@shrutikapoor08", "https://example.com/avatars/shruti.png"),
    ("Glenn", "Reyes", "@glnnrys", "https://example.com/avatars/glenn.png"),
    ("Ryan", "Florence", "@ryanflorence", "https://example.com/avatars/ryan.png"),
    ("Oscar", "Newman", "@__oscarnewman", "https://example.com/avatars/oscar.png"),
    ("Michael", "Jackson", "@mjackson", "https://example.com/avatars/michael.png"),
    ("Christopher", "Chedeau", "@Vjeux", "https://example.com/avatars/christopher.png"),
    ("Kent", "Dodds", "@kentcdodds", "https://example.com/avatars/kent.png"),
];

/// The fixed sample set.
pub fn sample_contacts() -> Vec<NewContact> {
    SAMPLES
        .iter()
        .map(|(first, last, twitter, avatar)| NewContact {
            first: (*first).to_string(),
            last: (*last).to_string(),
            twitter: (*twitter).to_string(),
            avatar: (*avatar).to_string(),
            ..Default::default()
        })
        .collect()
}

/// Insert the sample set through the typed create path if the store is empty.
/// Returns the number of contacts inserted.
pub async fn seed_if_empty(service: &Service) -> Result<usize, DomainError> {
    if service.count().await? > 0 {
        return Ok(0);
    }
    let samples = sample_contacts();
    let n = samples.len();
    for new in samples {
        service.create_validated(new).await?;
    }
    info!("Seeded {} sample contacts", n);
    Ok(n)
}
