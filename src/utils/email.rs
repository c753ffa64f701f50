// Envoi des emails transactionnels (vérification de compte, reset password).
// Si SMTP n'est pas configuré, le lien est loggé côté serveur — comportement
// voulu en développement pour tester le flow sans boîte mail.
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;

#[derive(Clone)]
pub struct Mailer {
    smtp_host: Option<String>,
    smtp_port: u16,
    smtp_username: String,
    smtp_password: String,
    from_email: String,
    base_url: String,
}

impl Mailer {
    pub fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@drolemedia.com".to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "https://drolemedia.com".to_string()),
        }
    }

    /// Email de vérification envoyé à l'inscription (token valable 24h)
    pub async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), String> {
        let url = format!("{}/verify-email?token={}", self.base_url, token);
        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h1>DROLE MEDIA</h1>\
             <h2>Bienvenue {} !</h2>\
             <p>Merci de votre inscription. Cliquez sur le lien ci-dessous pour \
             confirmer votre adresse email (valable 24 heures) :</p>\
             <p><a href=\"{}\">Confirmer mon inscription</a></p>\
             </div>",
            name, url
        );
        self.send(
            to,
            "Confirmez votre inscription - DROLE MEDIA",
            &html,
            &url,
        )
        .await
    }

    /// Email de réinitialisation de mot de passe (token valable 1h)
    pub async fn send_reset_email(&self, to: &str, token: &str) -> Result<(), String> {
        let url = format!("{}/reset-password?token={}", self.base_url, token);
        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h1>DROLE MEDIA</h1>\
             <h2>Réinitialisation de votre mot de passe</h2>\
             <p>Cliquez sur le lien ci-dessous pour choisir un nouveau mot de passe \
             (valable 1 heure) :</p>\
             <p><a href=\"{}\">Réinitialiser mon mot de passe</a></p>\
             </div>",
            url
        );
        self.send(to, "Réinitialisation de mot de passe - DROLE MEDIA", &html, &url)
            .await
    }

    async fn send(&self, to: &str, subject: &str, body_html: &str, link: &str) -> Result<(), String> {
        let Some(host) = self.smtp_host.as_deref() else {
            log::info!("📧 SMTP non configuré - lien pour {}: {}", to, link);
            return Ok(());
        };

        let from: Mailbox = self
            .from_email
            .parse()
            .map_err(|e| format!("Invalid from address: {}", e))?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| format!("Invalid to address: {}", e))?;

        let email = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body_html.to_string())
            .map_err(|e| format!("Failed to build email: {}", e))?;

        let creds = Credentials::new(self.smtp_username.clone(), self.smtp_password.clone());
        let mailer = SmtpTransport::relay(host)
            .map_err(|e| format!("SMTP relay error: {}", e))?
            .credentials(creds)
            .port(self.smtp_port)
            .build();

        // L'envoi SMTP de lettre est bloquant: déporté hors du worker async
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| format!("Email task failed: {}", e))?
            .map_err(|e| format!("Failed to send email: {}", e))?;

        log::info!("📧 Email envoyé à {}", to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer_without_smtp() -> Mailer {
        Mailer {
            smtp_host: None,
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "no-reply@drolemedia.com".to_string(),
            base_url: "https://drolemedia.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_verification_email_without_smtp_logs_link() {
        let mailer = mailer_without_smtp();
        assert!(mailer
            .send_verification_email("jean@example.com", "Jean", "token-123")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_email_without_smtp_logs_link() {
        let mailer = mailer_without_smtp();
        assert!(mailer
            .send_reset_email("jean@example.com", "token-456")
            .await
            .is_ok());
    }
}
