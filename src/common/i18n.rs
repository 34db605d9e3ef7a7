// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::LazyLock;

const DEFAULT_LANG: &str = "en";

// (chave, inglês, português)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("validation.invalid_fields", "One or more fields are invalid.", "Um ou mais campos são inválidos."),
    ("shift.invalid_window", "A shift must end after it starts.", "O turno deve terminar depois de começar."),
    ("shift.assignee_not_member", "The assignee is not a member of this branch.", "O responsável não faz parte desta filial."),
    ("auth.username_taken", "This username is already in use.", "Este nome de usuário já está em uso."),
    ("auth.email_taken", "This e-mail is already in use.", "Este e-mail já está em uso."),
    ("auth.invalid_credentials", "Invalid username or password.", "Usuário ou senha inválidos."),
    ("auth.invalid_token", "Missing or invalid authentication token.", "Token de autenticação inválido ou ausente."),
    ("auth.user_not_found", "User not found.", "Usuário não encontrado."),
    ("auth.password_change_required", "You must change your temporary password before continuing.", "Você precisa trocar a senha temporária antes de continuar."),
    ("membership.not_member", "You are not a member of this branch.", "Você não faz parte desta filial."),
    ("membership.owner_required", "Only the branch owner can do this.", "Apenas o dono da filial pode fazer isso."),
    ("membership.employee_required", "Only staff members can do this.", "Apenas funcionários podem fazer isso."),
    ("resource.not_found", "Resource not found: {0}.", "Recurso não encontrado: {0}."),
    ("clock.already_clocked_in", "You are already clocked in.", "Você já registrou a entrada."),
    ("clock.not_clocked_in", "You are not clocked in.", "Você não registrou a entrada."),
    ("clock.no_active_shift", "You have no shift scheduled right now.", "Você não tem turno agendado agora."),
    ("clock.shift_already_clocked", "You already clocked in for this shift.", "Você já registrou ponto neste turno."),
    ("assistant.invalid_date", "I couldn't work out which date you meant.", "Não consegui entender a data."),
    ("assistant.not_understood", "Sorry, I couldn't understand that. Try rephrasing.", "Desculpe, não entendi. Tente reformular."),
    ("business.invalid_time_zone", "Unknown time zone.", "Fuso horário desconhecido."),
    ("internal.unexpected", "An unexpected error occurred.", "Ocorreu um erro inesperado."),
];

/// Catálogo de mensagens por idioma.
#[derive(Debug)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

static SHARED: LazyLock<I18nStore> = LazyLock::new(I18nStore::new);

impl I18nStore {
    pub fn new() -> Self {
        let mut en = HashMap::new();
        let mut pt = HashMap::new();
        for (key, en_msg, pt_msg) in MESSAGES {
            en.insert(*key, *en_msg);
            pt.insert(*key, *pt_msg);
        }

        let mut catalogs = HashMap::new();
        catalogs.insert("en", en);
        catalogs.insert("pt", pt);
        Self { catalogs }
    }

    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    /// Idioma desconhecido cai no inglês; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn format(&self, lang: &str, key: &str, args: &[&str]) -> String {
        let mut message = self.translate(lang, key);
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", i), arg);
        }
        message
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("de", "clock.not_clocked_in"),
            "You are not clocked in."
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "nope.nothing"), "nope.nothing");
    }
}
