use futures::future::try_join_all;
use image::DynamicImage;
use log::{debug, info};
use std::io::Cursor;

use super::window::comic_numbers;
use super::xkcd::{ComicRecord, ComicSource};
use crate::error::PagerError;

/// A fetched comic, ready to be placed into a slot.
#[derive(Debug, Clone)]
pub struct LoadedComic {
    pub record: ComicRecord,
    pub image: Option<DynamicImage>,
}

/// Fetches every comic in the window around `center` concurrently.
///
/// Results come back in window order no matter which request finishes first.
/// Any failed request fails the whole page.
pub async fn update_comic_page<S: ComicSource>(
    source: &S,
    center: i64,
    count: usize,
) -> Result<Vec<LoadedComic>, PagerError> {
    let numbers = comic_numbers(center, count);
    info!("updating comic page {:?}", numbers);

    try_join_all(numbers.into_iter().map(|num| load_comic(source, num))).await
}

async fn load_comic<S: ComicSource>(source: &S, num: i64) -> Result<LoadedComic, PagerError> {
    let record = source.fetch_comic(num).await?;

    // Interactive comics have no image.
    let image = if record.img.is_empty() {
        None
    } else {
        let bytes = source.fetch_image(&record.img).await?;
        decode_image(&bytes, &record)
    };

    Ok(LoadedComic { record, image })
}

fn decode_image(bytes: &[u8], record: &ComicRecord) -> Option<DynamicImage> {
    let decoded = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.decode().ok());

    if decoded.is_none() {
        debug!("could not decode image for comic {} ({})", record.num, record.img);
    }
    decoded
}

/// Hands out increasing ids for page updates so that a result arriving after
/// a newer update has started can be recognised and dropped.
#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, request: u64) -> bool {
        request == self.latest
    }
}
