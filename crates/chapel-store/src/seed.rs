use tracing::{debug, error, info};

use chapel_types::models::{Member, Setting};

use crate::Store;

/// Institutional texts every installation starts with. Editing them later
/// through the settings route is preserved across restarts.
pub const DEFAULT_SETTINGS: [(&str, &str); 3] = [
    (
        "mission",
        "Adorar a deus, anunciando a salvação através de Cristo Jesus, em uma nova vida de regeneração e conversão genuína, pela ação do Espirito Santo, conhecendo a Deus e fazendo-o conhecido. Este processo inicia no indivíduo, transborda na família, igreja e na sociedade.",
    ),
    (
        "vision",
        "Trazer pessoas a Jesus pelo evangelho, solidifica-las na maturidade cristã e equipá-las como igreja, para uma vida organizada de adoração, assistência mútua e expansão do Reino de Deus.",
    ),
    (
        "culture",
        "Uma igreja que vive o Reino de Deus; uma família que acolhe, ama, cuida, capacita, inspira e envia filhos para o seu propósito. Uma igreja relevante na sociedade que está inserida, adorando a Deus, servindo à comunidade",
    ),
];

/// Owner account to guarantee at startup.
#[derive(Debug, Clone)]
pub struct OwnerSeed {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
}

impl OwnerSeed {
    fn into_member(self) -> Member {
        Member {
            name: Some(self.name),
            email: Some(self.email),
            cpf: Some(self.cpf),
            photo: None,
            role_media: 1,
            role_council: 1,
            role_board: 1,
            role_deacon: 1,
            board_position: Some("Proprietário".to_string()),
            is_admin: 1,
            password: Some(self.password),
        }
    }
}

/// Inserts each default setting whose key is missing. Failures are logged.
pub async fn seed_settings(store: &dyn Store) {
    for (key, value) in DEFAULT_SETTINGS {
        if let Err(e) = store.insert_setting_if_absent(Setting::new(key, value)).await {
            error!("Failed to seed setting '{}': {}", key, e);
        }
    }
    info!("Default settings checked");
}

/// Creates the owner account unless a member with the same CPF exists.
/// Failures are logged.
pub async fn seed_owner(store: &dyn Store, owner: OwnerSeed) {
    match store.find_member_by_cpf(&owner.cpf).await {
        Err(e) => error!("Failed to look up owner account: {}", e),
        Ok(Some(existing)) => debug!("Owner account already present (id {})", existing.id),
        Ok(None) => {
            let email = owner.email.clone();
            match store.insert_member(owner.into_member()).await {
                Ok(()) => info!("Created owner account for {}", email),
                Err(e) => error!("Failed to create owner account: {}", e),
            }
        }
    }
}
