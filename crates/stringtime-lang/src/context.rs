use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::Value;

/// Read-only lookup of named values for one render call.
///
/// The name is the field qualifier exactly as written in the template, so a
/// dotted path such as `blog.date.created` arrives as a single key. How (or
/// whether) the path is traversed is up to the implementation.
///
/// ```
/// use std::borrow::Cow;
/// use stringtime_lang::{Context, Value};
///
/// struct Post {
///     title: &'static str,
///     views: u32,
/// }
///
/// impl Context for Post {
///     fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
///         match name {
///             "title" => Some(Cow::Owned(self.title.into())),
///             "views" => Some(Cow::Owned(self.views.into())),
///             _ => None,
///         }
///     }
/// }
///
/// let template = stringtime_lang::compile("{{title}} ({{views}})").unwrap();
/// let post = Post { title: "Hello", views: 3 };
/// assert_eq!(template.render(&post).unwrap(), "Hello (3)");
/// ```
pub trait Context {
    fn get(&self, name: &str) -> Option<Cow<'_, Value>>;
}

impl<C: Context + ?Sized> Context for &C {
    #[inline(always)]
    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        (**self).get(name)
    }
}

impl<K, S> Context for HashMap<K, Value, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    #[inline(always)]
    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        HashMap::get(self, name).map(Cow::Borrowed)
    }
}

impl<K> Context for BTreeMap<K, Value>
where
    K: Borrow<str> + Ord,
{
    #[inline(always)]
    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        BTreeMap::get(self, name).map(Cow::Borrowed)
    }
}

/// Dotted names walk nested objects: `blog.date` reads `{"blog": {"date": ..}}`.
/// A numeric segment indexes an array, as in `posts.0.title`.
impl Context for serde_json::Value {
    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        name.split('.')
            .try_fold(self, |json, segment| match json {
                serde_json::Value::Object(map) => map.get(segment),
                serde_json::Value::Array(values) => {
                    segment.parse::<usize>().ok().and_then(|i| values.get(i))
                }
                _ => None,
            })
            .and_then(Value::from_json)
            .map(Cow::Owned)
    }
}

/// A [`Context`] backed by a closure, see [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(F);

/// Adapts a closure into a [`Context`].
///
/// ```
/// let context = stringtime_lang::from_fn(|name| (name == "name").then(|| "closure".into()));
/// let template = stringtime_lang::compile("Hi {{name}}!").unwrap();
/// assert_eq!(template.render(&context).unwrap(), "Hi closure!");
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&str) -> Option<Value>,
{
    FromFn(f)
}

impl<F> Context for FromFn<F>
where
    F: Fn(&str) -> Option<Value>,
{
    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        (self.0)(name).map(Cow::Owned)
    }
}

/// Builds a `HashMap<SmolStr, Value>` context.
///
/// ```
/// let context = stringtime_lang::context! {
///     "name" => "Zig stringtime",
///     "list" => vec!["First", "Second"],
/// };
/// assert_eq!(context.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut context = ::std::collections::HashMap::<$crate::SmolStr, $crate::Value>::new();
        $(
            context.insert($crate::SmolStr::from($name), $crate::Value::from($value));
        )*
        context
    }};
}
