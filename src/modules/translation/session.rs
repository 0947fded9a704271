use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::{error, info};

use crate::modules::speech::capturer::SpeechCapturer;
use crate::modules::speech::controller::run_session;
use crate::modules::translation::controller::{
    reduce, ReducerContext, TranslatorEffect, TranslatorEvent,
};
use crate::modules::translation::model::{TranslationResult, TranslatorState};
use crate::modules::translation::schema::TranslationRequest;
use crate::modules::translation::view::{render, TranslatorView};
use crate::platform::Prompter;
use crate::services::translator::TranslateError;

#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslateError>;
}

pub struct TranslatorSession<T, S, P> {
    state: TranslatorState,
    ctx: ReducerContext,
    service: T,
    capturer: S,
    prompter: P,
}

impl<T, S, P> TranslatorSession<T, S, P>
where
    T: TranslationService,
    S: SpeechCapturer,
    P: Prompter,
{
    pub fn new(ctx: ReducerContext, service: T, capturer: S, prompter: P) -> Self {
        let ctx = ReducerContext {
            speech_available: capturer.is_available(),
            ..ctx
        };

        Self {
            state: TranslatorState::default(),
            ctx,
            service,
            capturer,
            prompter,
        }
    }

    pub fn state(&self) -> &TranslatorState {
        &self.state
    }

    pub fn view(&self) -> TranslatorView {
        render(&self.state, &self.ctx)
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub async fn dispatch(&mut self, event: TranslatorEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let transition = reduce(&self.state, event, &self.ctx);
            self.state = transition.state;

            for effect in transition.effects {
                match effect {
                    TranslatorEffect::Alert(message) => self.prompter.alert(&message),
                    TranslatorEffect::Confirm(message) => {
                        let follow_up = if self.prompter.confirm(&message) {
                            TranslatorEvent::SubmitConfirmed
                        } else {
                            TranslatorEvent::SubmitDeclined
                        };
                        queue.push_back(follow_up);
                    }
                    TranslatorEffect::SendTranslation(request) => {
                        let follow_up = match self.service.translate(&request).await {
                            Ok(result) => {
                                info!(target_lang = %request.target_lang, "Translation succeeded");
                                TranslatorEvent::TranslationSucceeded(result)
                            }
                            Err(e) => {
                                error!(error = %e, "Translation failed");
                                TranslatorEvent::TranslationFailed(e.to_string())
                            }
                        };
                        queue.push_back(follow_up);
                    }
                    TranslatorEffect::StartRecognition { language } => {
                        for event in run_session(&self.capturer, &language).await {
                            queue.push_back(TranslatorEvent::Recognition(event));
                        }
                    }
                }
            }
        }
    }
}
