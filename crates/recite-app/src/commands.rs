use recite_core::request_log::RequestContext;
use recite_service::{Envelope, ReciteService, UnitWordItem};
use serde_json::{Value, json};

use crate::cli::{AudioCommand, Command, ForgottenCommand, ReviewCommand, UnitWordsCommand, UnitsCommand};

/// Run one command and wrap its outcome the way the HTTP layer would
pub async fn dispatch(service: &ReciteService, ctx: &RequestContext, command: Command) -> Envelope {
    match command {
        Command::Query { word } => {
            Envelope::from_result(service.query_word(ctx, &word).await.map(|w| json!({ "word": w })))
        }
        Command::Units(command) => units(service, ctx, command).await,
        Command::UnitWords(command) => unit_words(service, ctx, command).await,
        Command::Review(command) => review(service, command).await,
        Command::Forgotten(command) => forgotten(service, ctx, command).await,
        Command::Audio(AudioCommand::Ensure { word }) => Envelope::from_result(
            service
                .ensure_word_audio(ctx, &word)
                .await
                .map(|status| json!({ "word": word, "audio": status })),
        ),
        Command::Config => Envelope::success(json!({ "config": service.client_config() })),
    }
}

async fn units(service: &ReciteService, ctx: &RequestContext, command: UnitsCommand) -> Envelope {
    let result = match command {
        UnitsCommand::List => service.list_units().await.map(|units| json!({ "units": units })),
        UnitsCommand::Create { name, date } => service
            .create_unit(ctx, &name, &date)
            .await
            .map(|unit| json!({ "unit": unit })),
        UnitsCommand::Rename { unit_id, name, date } => service
            .rename_unit(ctx, unit_id, &name, &date)
            .await
            .map(|unit| json!({ "unit": unit })),
        UnitsCommand::Reorder { unit_ids } => service
            .reorder_units(ctx, &unit_ids)
            .await
            .map(|()| json!({ "unit_ids": unit_ids })),
        UnitsCommand::Delete { unit_id } => service
            .delete_unit(ctx, unit_id)
            .await
            .map(|()| json!({ "unit_id": unit_id })),
    };
    Envelope::from_result(result)
}

async fn unit_words(service: &ReciteService, ctx: &RequestContext, command: UnitWordsCommand) -> Envelope {
    let result = match command {
        UnitWordsCommand::Add { unit_id, word } => service
            .add_word_to_unit(ctx, unit_id, &word)
            .await
            .map(|w| json!({ "unit_id": unit_id, "word": w })),
        UnitWordsCommand::List { unit_id } => service.list_unit_words(unit_id).await.map(word_list),
        UnitWordsCommand::Dictation { unit_id } => service.unit_dictation(unit_id).await.map(word_list),
    };
    Envelope::from_result(result)
}

async fn review(service: &ReciteService, command: ReviewCommand) -> Envelope {
    let result = match command {
        ReviewCommand::Dates { recent_days } => service
            .review_date_options(recent_days)
            .map(|dates| json!({ "dates": dates })),
        ReviewCommand::Words { date } => service
            .review_words(&date)
            .await
            .map(|review| json!({ "words": review.words, "units": review.units })),
        ReviewCommand::Dictation { date } => service.review_dictation(&date).await.map(word_list),
    };
    Envelope::from_result(result)
}

async fn forgotten(service: &ReciteService, ctx: &RequestContext, command: ForgottenCommand) -> Envelope {
    let result = match command {
        ForgottenCommand::Add { word } => service
            .add_forgotten_word(ctx, &word)
            .await
            .map(|w| json!({ "word": w })),
        ForgottenCommand::List => service.list_forgotten_words().await.map(word_list),
        ForgottenCommand::Remember { word } => service
            .remember_forgotten_word(ctx, &word)
            .await
            .map(|cleared| json!({ "cleared": cleared })),
        ForgottenCommand::Dictation => service.forgotten_dictation().await.map(word_list),
    };
    Envelope::from_result(result)
}

fn word_list(words: Vec<UnitWordItem>) -> Value {
    json!({ "total": words.len(), "words": words })
}
