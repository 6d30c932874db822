use askama::Template;
use axum::{
    extract::{Extension, Form, Path, Query},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    client::HttpRemote,
    contact::{ContactId, Draft},
    controller::{Controller, View},
    notification::render,
    server::{Accept, ServerError},
};

pub async fn index(
    Query(params): Query<IndexParams>,
    accept: Accept,
    Extension(controller): Extension<&'static Controller<HttpRemote>>,
) -> Result<Response, ServerError> {
    if let Some(filter) = params.filter {
        controller.set_filter(filter);
    }

    let page = PhonebookPage::new(controller.view())?;

    accept.into_response(page)
}

pub async fn add(
    Extension(controller): Extension<&'static Controller<HttpRemote>>,
    Form(draft): Form<Draft>,
) -> Redirect {
    controller.submit(draft).await;

    Redirect::to("/")
}

pub async fn confirm_delete(
    Path(id): Path<String>,
    Extension(controller): Extension<&'static Controller<HttpRemote>>,
) -> Result<Response, ServerError> {
    let id = ContactId::from(id);

    let response = match controller.delete_prompt(&id) {
        Some(prompt) => ConfirmPage { id, prompt }.into_response()?,
        None => Redirect::to("/").into_response(),
    };

    Ok(response)
}

pub async fn delete(
    Path(id): Path<String>,
    Extension(controller): Extension<&'static Controller<HttpRemote>>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, ServerError> {
    let confirmed = match &*form.confirm {
        "yes" => true,
        "no" => false,
        _ => return Err(ServerError::BadRequest("Confirmation must be yes or no")),
    };

    controller
        .delete(&ContactId::from(id), move |_prompt| confirmed)
        .await;

    Ok(Redirect::to("/"))
}

#[derive(Deserialize)]
pub struct IndexParams {
    filter: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteForm {
    confirm: String,
}

#[derive(Template, Serialize)]
#[template(path = "phonebook.html")]
struct PhonebookPage {
    #[serde(flatten)]
    view: View,
    #[serde(skip)]
    notification: String,
}

impl PhonebookPage {
    fn new(view: View) -> Result<Self, ServerError> {
        let notification = render(view.notification.as_ref())?;

        Ok(Self { view, notification })
    }
}

#[derive(Template)]
#[template(path = "confirm.html")]
struct ConfirmPage {
    id: ContactId,
    prompt: String,
}

impl ConfirmPage {
    fn into_response(self) -> Result<Response, ServerError> {
        let page = self.render()?;

        Ok(Html(page).into_response())
    }
}
