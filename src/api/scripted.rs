//! In-memory [`Transport`] replaying prepared responses.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    api::{Response, Transport},
    prelude::*,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    Get(String),
    PostForm(String, Vec<(String, String)>),
}

impl Call {
    pub fn url(&self) -> &str {
        match self {
            Self::Get(url) | Self::PostForm(url, _) => url,
        }
    }
}

/// Clones share the script and the call log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Rc<RefCell<VecDeque<Response>>>,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        Self {
            responses: Rc::new(RefCell::new(responses.into_iter().collect())),
            calls: Rc::default(),
        }
    }

    /// Respond `200 OK` with the body, as if the request had landed on `url`.
    pub fn ok(url: &str, body: &str) -> Response {
        Response::new(url, 200, body)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next(&self, call: Call) -> Result<Response> {
        let url = call.url().to_owned();
        self.calls.borrow_mut().push(call);
        self.responses
            .borrow_mut()
            .pop_front()
            .with_context(|| format!("no response scripted for `{url}`"))
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<Response> {
        self.next(Call::Get(url.to_owned()))
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Response> {
        let fields =
            fields.iter().map(|(name, value)| ((*name).to_owned(), (*value).to_owned())).collect();
        self.next(Call::PostForm(url.to_owned(), fields))
    }
}
