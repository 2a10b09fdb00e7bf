/*!
Structs to hold configuration data and global variables.
*/
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::store::Store;

#[derive(Deserialize)]
struct ConfigFile {
    db_connect_string: Option<String>,
    admin_name: Option<String>,
    admin_email: Option<String>,
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug)]
pub struct Cfg {
    pub db_connect_string: String,
    pub default_admin_name: String,
    pub default_admin_email: String,
    pub addr: SocketAddr,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            db_connect_string: "host=localhost user=fluente_test password='fluente_test' dbname=fluente_store_test".to_owned(),
            default_admin_name: "root".to_owned(),
            default_admin_email: "admin@fluente.not.an.address".to_owned(),
            addr: SocketAddr::new(
                "0.0.0.0".parse().unwrap(),
                8000
            ),
        }
    }
}

impl Cfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file: {}", &e))?;
        Self::from_toml(&file_contents)
    }

    pub fn from_toml(text: &str) -> Result<Self, String> {
        let cf: ConfigFile = toml::from_str(text)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.db_connect_string {
            c.db_connect_string = s;
        }
        if let Some(s) = cf.admin_name {
            c.default_admin_name = s;
        }
        if let Some(s) = cf.admin_email {
            c.default_admin_email = s;
        }
        if let Some(s) = cf.host {
            c.addr.set_ip(
                s.parse().map_err(|e| format!(
                    "Error parsing {:?} as IP address: {}",
                    &s, &e
                ))?
            );
        }
        if let Some(n) = cf.port {
            c.addr.set_port(n);
        }

        Ok(c)
    }
}

/**
This guy will haul around the shared handles and be passed in an
`axum::Extension` to the handlers who need him.

There is deliberately no cached entity state in here; the database is the
single source of truth, and every handler reads through the `Store`.
*/
#[derive(Debug)]
pub struct Glob {
    pub store: Store,
    pub addr: SocketAddr,
}

/// Loads system configuration and ensures all appropriate database tables
/// exist.
///
/// Also assures existence of the default admin record.
pub async fn load_configuration<P: AsRef<Path>>(path: P) -> Result<Arc<Glob>, String> {
    let path = path.as_ref();
    let cfg = if path.exists() {
        Cfg::from_file(path)?
    } else {
        log::info!(
            "No config file at {}; using default configuration.",
            path.display()
        );
        Cfg::default()
    };
    log::info!("Configuration:\n{:#?}", &cfg);

    log::trace!("Checking state of data DB...");
    let store = Store::new(cfg.db_connect_string.clone());
    if let Err(e) = store.ensure_db_schema().await {
        let estr = format!("Unable to ensure state of data DB: {}", &e);
        return Err(estr);
    }
    log::trace!("...data DB okay.");

    log::trace!("Checking existence of default Admin...");
    match store.get_admins().await {
        Err(e) => {
            let estr = format!("Error listing admins from data DB: {}", &e);
            return Err(estr);
        },
        Ok(admins) if admins.is_empty() => {
            log::info!(
                "No admins in data DB; inserting default Admin ({}).",
                &cfg.default_admin_email
            );
            if let Err(e) = store.insert_admin(
                &cfg.default_admin_name,
                &cfg.default_admin_email
            ).await {
                let estr = format!("Error inserting default Admin: {}", &e);
                return Err(estr);
            }
        },
        Ok(admins) => {
            log::trace!("{} admin(s) already present.", admins.len());
        },
    }
    log::trace!("Default Admin OK.");

    let glob = Glob {
        store,
        addr: cfg.addr,
    };

    Ok(Arc::new(glob))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_overlaid_by_file_values() {
        let cfg = Cfg::from_toml(
            r#"
            db_connect_string = "host=db.internal user=fluente dbname=fluente"
            host = "127.0.0.1"
            port = 8080
            "#
        ).unwrap();

        assert_eq!(
            cfg.db_connect_string,
            "host=db.internal user=fluente dbname=fluente"
        );
        assert_eq!(cfg.addr, "127.0.0.1:8080".parse().unwrap());
        // Untouched fields keep their defaults.
        assert_eq!(cfg.default_admin_name, "root");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = Cfg::from_toml("").unwrap();
        let def = Cfg::default();
        assert_eq!(cfg.addr, def.addr);
        assert_eq!(cfg.db_connect_string, def.db_connect_string);
    }

    #[test]
    fn bad_host_is_an_error() {
        assert!(Cfg::from_toml(r#"host = "not-an-ip""#).is_err());
    }
}
