use std::{
    any::Any,
    fs, io,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
};

use glam::Vec2;
use isogrid_rendering::{AssetError, AssetSource, SpriteKey, SpriteManifest, SpriteSet};
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, FilterMode, Image, Texture2D},
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Reads asset bytes from disk, separating missing files from other I/O failures.
pub(crate) fn read_asset(path: &Path) -> Result<Vec<u8>, AssetError> {
    fs::read(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => AssetError::AssetNotFound {
            path: path.to_path_buf(),
        },
        _ => AssetError::Unreadable {
            path: path.to_path_buf(),
            message: error.to_string(),
        },
    })
}

/// Asset source that decodes sprite files from disk and hands the image to an uploader.
pub(crate) struct FileAssetSource<F> {
    upload: F,
}

impl<F> FileAssetSource<F>
where
    F: FnMut(&Image) -> Texture2D,
{
    pub(crate) fn new(upload: F) -> Self {
        Self { upload }
    }
}

impl<F> AssetSource for FileAssetSource<F>
where
    F: FnMut(&Image) -> Texture2D,
{
    type Sprite = Texture2D;

    fn load_sprite(&mut self, path: &Path) -> Result<Texture2D, AssetError> {
        let bytes = read_asset(path)?;
        if !bytes.starts_with(&PNG_SIGNATURE) {
            return Err(AssetError::Undecodable {
                path: PathBuf::from(path),
                message: "sprites must be PNG images".to_owned(),
            });
        }
        let image = decode_image(path, &bytes)?;
        Ok((self.upload)(&image))
    }
}

/// Decodes PNG bytes into pixels.
///
/// The macroquad decoder panics on malformed data, so the panic is caught and
/// reported as [`AssetError::Undecodable`].
pub(crate) fn decode_image(path: &Path, bytes: &[u8]) -> Result<Image, AssetError> {
    panic::catch_unwind(AssertUnwindSafe(|| Image::from_file_with_format(bytes, None))).map_err(
        |payload| AssetError::Undecodable {
            path: path.to_path_buf(),
            message: panic_message(payload.as_ref()),
        },
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        "image decoder failed".to_owned()
    }
}

/// Uploads decoded pixels as a nearest-filtered texture so the cubes stay crisp when scaled.
pub(crate) fn upload_texture(image: &Image) -> Texture2D {
    let texture = Texture2D::from_image(image);
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Textures for every sprite key, drawn at a fixed size.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: SpriteSet<Texture2D>,
    size: Vec2,
}

impl SpriteAtlas {
    pub(crate) fn load<A>(
        source: &mut A,
        manifest: &SpriteManifest,
        size: Vec2,
    ) -> Result<Self, AssetError>
    where
        A: AssetSource<Sprite = Texture2D>,
    {
        Ok(Self {
            textures: SpriteSet::load(source, manifest)?,
            size,
        })
    }

    /// Draws `key` with its top-left corner at `position`, alpha blended and
    /// scaled to the atlas size.
    pub(crate) fn draw(&self, key: SpriteKey, position: Vec2) {
        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(self.size.x, self.size.y)),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(*self.textures.get(key), position.x, position.y, WHITE, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn manifest(floor: PathBuf) -> SpriteManifest {
        SpriteManifest::new(floor, "player.png".into(), "goal.png".into())
    }

    #[test]
    fn missing_sprite_reports_asset_not_found() {
        let mut source = FileAssetSource::new(|_: &Image| Texture2D::empty());
        let path = Path::new("definitely/not/here.png");

        assert_eq!(
            source.load_sprite(path).map(|_| ()),
            Err(AssetError::AssetNotFound {
                path: path.to_path_buf()
            })
        );
    }

    #[test]
    fn non_png_files_are_rejected_before_decoding() {
        let decoded = RefCell::new(0);
        let mut source = FileAssetSource::new(|_: &Image| {
            *decoded.borrow_mut() += 1;
            Texture2D::empty()
        });
        let cargo_toml = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

        assert!(matches!(
            source.load_sprite(&cargo_toml),
            Err(AssetError::Undecodable { .. })
        ));
        assert_eq!(*decoded.borrow(), 0);
    }

    #[test]
    fn atlas_load_stops_at_first_missing_sprite() {
        let mut source = FileAssetSource::new(|_: &Image| Texture2D::empty());

        let error = SpriteAtlas::load(
            &mut source,
            &manifest("missing/floor.png".into()),
            Vec2::new(84.0, 88.0),
        )
        .expect_err("floor sprite is missing");

        assert_eq!(
            error,
            AssetError::AssetNotFound {
                path: PathBuf::from("missing/floor.png")
            }
        );
    }

    #[test]
    fn shipped_sprites_are_png_files() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let loaded = RefCell::new(Vec::new());
        let mut source = FileAssetSource::new(|image: &Image| {
            loaded.borrow_mut().push((image.width, image.height));
            Texture2D::empty()
        });
        let manifest = SpriteManifest::new(
            root.join("pinkCube.png"),
            root.join("greenCube.png"),
            root.join("blueCube.png"),
        );

        let _atlas = SpriteAtlas::load(&mut source, &manifest, Vec2::new(84.0, 88.0))
            .expect("bundled sprites load");

        assert_eq!(*loaded.borrow(), vec![(21, 22); 3]);
    }

    #[test]
    fn corrupt_png_is_reported_as_undecodable() {
        let path = std::env::temp_dir().join(format!("isogrid-corrupt-{}.png", std::process::id()));
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(b"not an image header");
        fs::write(&path, &bytes).expect("write corrupt sprite");
        let uploaded = RefCell::new(0);
        let mut source = FileAssetSource::new(|_: &Image| {
            *uploaded.borrow_mut() += 1;
            Texture2D::empty()
        });

        let result = source.load_sprite(&path).map(|_| ());
        let _ = fs::remove_file(&path);

        assert!(matches!(
            result,
            Err(AssetError::Undecodable { path: reported, .. }) if reported == path
        ));
        assert_eq!(*uploaded.borrow(), 0);
    }
}
