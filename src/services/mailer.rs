// src/services/mailer.rs

use async_trait::async_trait;

/// Envio de notificações (convites). Falha sempre de forma explícita.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Backend de console: escreve a mensagem no log.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if recipient.trim().is_empty() {
            anyhow::bail!("destinatário vazio");
        }
        tracing::info!(
            from = %self.from,
            to = %recipient,
            subject = %subject,
            "📧 e-mail enviado\n{}",
            body
        );
        Ok(())
    }
}

// A senha temporária vai no corpo em texto puro (endurecer isso é papel do remetente)
pub fn invitation_message(business_name: &str, username: &str, temp_password: &str) -> (String, String) {
    let subject = format!("Invitation to join {} on CheckPoint", business_name);
    let body = format!(
        "You have been invited to join {business_name} as a staff member.\n\n\
         Please use the following username: {username}\n\n\
         Your temporary password is: {temp_password}\n\n\
         Please log in and change your password as soon as possible."
    );
    (subject, body)
}
